// crates/flb_physics/src/lattice.rs

//! D2Q9 离散速度集
//!
//! 方向编号约定（0 基）：
//!
//! ```text
//!   6  2  5
//!   3  0  1
//!   7  4  8
//! ```
//!
//! 0 为静止方向，1..4 为轴向，5..8 为对角。强迫注入与迁移 gather
//! 均以该编号为准。

/// 离散速度方向数
pub const Q: usize = 9;

/// 各方向 x 位移分量
pub const EX: [i32; Q] = [0, 1, 0, -1, 0, 1, -1, -1, 1];

/// 各方向 y 位移分量
pub const EY: [i32; Q] = [0, 0, 1, 0, -1, 1, 1, -1, -1];

/// 格子权重（Σw = 1）
pub const WEIGHTS: [f64; Q] = [
    4.0 / 9.0,
    1.0 / 9.0,
    1.0 / 9.0,
    1.0 / 9.0,
    1.0 / 9.0,
    1.0 / 36.0,
    1.0 / 36.0,
    1.0 / 36.0,
    1.0 / 36.0,
];

/// 反向方向查找表（OPPOSITE[k] 与 k 速度相反）
pub const OPPOSITE: [usize; Q] = [0, 3, 4, 1, 2, 7, 8, 5, 6];

/// 格子声速平方 cs² = 1/3（格子单位）
pub const SOUND_SPEED_SQ: f64 = 1.0 / 3.0;
