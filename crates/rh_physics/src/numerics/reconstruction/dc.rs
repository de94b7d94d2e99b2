// relhydro\crates\rh_physics\src/numerics/reconstruction/dc.rs

//! 一阶 donor-cell 重构

use super::Reconstructor;

/// 界面值取单元平均值
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DonorCell;

impl Reconstructor for DonorCell {
    fn name(&self) -> &'static str {
        "dc"
    }

    fn ghost_width(&self) -> usize {
        1
    }

    #[inline]
    fn reconstruct_line(&self, q: &[f64], il: usize, iu: usize, ql: &mut [f64], qr: &mut [f64]) {
        for i in il..=iu {
            ql[i + 1] = q[i];
            qr[i] = q[i];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copies_cell_values() {
        let q = [1.0, 2.0, 3.0, 4.0];
        let mut ql = [0.0; 5];
        let mut qr = [0.0; 5];
        DonorCell.reconstruct_line(&q, 1, 2, &mut ql, &mut qr);
        assert_eq!(ql[2], 2.0);
        assert_eq!(ql[3], 3.0);
        assert_eq!(qr[1], 2.0);
        assert_eq!(qr[2], 3.0);
    }
}
