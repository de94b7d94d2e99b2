// relhydro\crates\rh_physics\src/primitive/root.rs

//! 有界 Brent 根求解
//!
//! 逆二次插值 + 割线 + 二分的组合，区间始终保持变号，
//! 迭代次数有硬上限。被求函数返回 NaN 时不会 panic，只会耗尽迭代。

/// 根求解失败原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootError {
    /// 端点函数值同号或非有限
    NotBracketed,
    /// 达到迭代上限
    MaxIterations,
}

/// 根与迭代次数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Root {
    /// 根
    pub x: f64,
    /// 迭代次数
    pub iterations: usize,
}

/// 在 `[x1, x2]` 上求 `f` 的根，绝对容差 `tol`
pub fn brent<F>(mut f: F, x1: f64, x2: f64, tol: f64, max_iterations: usize) -> Result<Root, RootError>
where
    F: FnMut(f64) -> f64,
{
    let (mut a, mut b) = (x1, x2);
    let (mut fa, mut fb) = (f(a), f(b));
    if !fa.is_finite() || !fb.is_finite() || (fa > 0.0 && fb > 0.0) || (fa < 0.0 && fb < 0.0) {
        return Err(RootError::NotBracketed);
    }

    let (mut c, mut fc) = (b, fb);
    let (mut d, mut e) = (b - a, b - a);

    for iteration in 1..=max_iterations {
        if (fb > 0.0 && fc > 0.0) || (fb < 0.0 && fc < 0.0) {
            c = a;
            fc = fa;
            d = b - a;
            e = d;
        }
        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }

        let tol1 = 2.0 * f64::EPSILON * b.abs() + 0.5 * tol;
        let xm = 0.5 * (c - b);
        if xm.abs() <= tol1 || fb == 0.0 {
            return Ok(Root { x: b, iterations: iteration });
        }

        if e.abs() >= tol1 && fa.abs() > fb.abs() {
            // 插值步
            let s = fb / fa;
            let mut p;
            let mut q;
            if a == c {
                p = 2.0 * xm * s;
                q = 1.0 - s;
            } else {
                let qa = fa / fc;
                let r = fb / fc;
                p = s * (2.0 * xm * qa * (qa - r) - (b - a) * (r - 1.0));
                q = (qa - 1.0) * (r - 1.0) * (s - 1.0);
            }
            if p > 0.0 {
                q = -q;
            }
            p = p.abs();
            let min1 = 3.0 * xm * q - (tol1 * q).abs();
            let min2 = (e * q).abs();
            if 2.0 * p < min1.min(min2) {
                e = d;
                d = p / q;
            } else {
                d = xm;
                e = d;
            }
        } else {
            // 二分步
            d = xm;
            e = d;
        }

        a = b;
        fa = fb;
        b += if d.abs() > tol1 { d } else { tol1.copysign(xm) };
        fb = f(b);
    }

    Err(RootError::MaxIterations)
}
