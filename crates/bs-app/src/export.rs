//! CSV export of trajectories.

use std::io::Write;

use bs_sim::Trajectory;

use crate::error::AppResult;

/// Write `t,iL,vo` rows, one per tick, with a header line.
pub fn write_csv<W: Write>(traj: &Trajectory, mut out: W) -> AppResult<()> {
    writeln!(out, "t,iL,vo")?;
    for sample in traj.samples() {
        writeln!(out, "{},{},{}", sample.t, sample.il, sample.vo)?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_header_and_rows() {
        let traj = Trajectory {
            t: vec![0.5, 1.0],
            il: vec![1.25, 2.0],
            vo: vec![10.0, 20.5],
        };
        let mut buf = Vec::new();
        write_csv(&traj, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "t,iL,vo\n0.5,1.25,10\n1,2,20.5\n");
    }
}
