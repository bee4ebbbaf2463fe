// crates/flb_physics/src/grid.rs

//! 双周期结构化网格
//!
//! 环面拓扑：每个格点都有 8 个确定的邻居，无边界特判。
//! 存储采用行主序，x 连续（`idx = y*nx + x`）。

use flb_foundation::{ensure, FlbError, FlbResult};

/// 双周期二维网格
///
/// 不持有场数据，只负责尺寸与索引换算。场数组的长度约定为 `len()`。
///
/// # 示例
///
/// ```
/// use flb_physics::grid::PeriodicGrid;
///
/// let grid = PeriodicGrid::new(64, 32).unwrap();
/// assert_eq!(grid.len(), 64 * 32);
/// assert_eq!(grid.idx(63, 0), 63);
/// // 周期回绕
/// assert_eq!(grid.offset_x(63, 1), 0);
/// assert_eq!(grid.offset_y(0, -1), 31);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodicGrid {
    nx: usize,
    ny: usize,
}

impl PeriodicGrid {
    /// 创建网格
    ///
    /// 两个方向尺寸都必须非零；允许 ny = 1 的准一维退化
    /// （此时 y 方向回绕到自身，gy 恒为零）。
    pub fn new(nx: usize, ny: usize) -> FlbResult<Self> {
        ensure!(
            nx > 0 && ny > 0,
            FlbError::invalid_input(format!("网格尺寸必须非零: nx={nx}, ny={ny}"))
        );
        Ok(Self { nx, ny })
    }

    /// x 方向格点数
    #[inline]
    pub fn nx(&self) -> usize {
        self.nx
    }

    /// y 方向格点数
    #[inline]
    pub fn ny(&self) -> usize {
        self.ny
    }

    /// 总格点数
    #[inline]
    pub fn len(&self) -> usize {
        self.nx * self.ny
    }

    /// 网格是否为空（构造保证非空，保留以满足惯用接口）
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 展平索引
    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.nx && y < self.ny);
        y * self.nx + x
    }

    /// x 坐标沿周期方向偏移一格
    ///
    /// 仅支持 dx ∈ {-1, 0, 1}，迁移与差分模板只访问最近邻。
    #[inline]
    pub fn offset_x(&self, x: usize, dx: i32) -> usize {
        debug_assert!((-1..=1).contains(&dx));
        match dx {
            1 => {
                if x + 1 == self.nx {
                    0
                } else {
                    x + 1
                }
            }
            -1 => {
                if x == 0 {
                    self.nx - 1
                } else {
                    x - 1
                }
            }
            _ => x,
        }
    }

    /// y 坐标沿周期方向偏移一格（dy ∈ {-1, 0, 1}）
    #[inline]
    pub fn offset_y(&self, y: usize, dy: i32) -> usize {
        debug_assert!((-1..=1).contains(&dy));
        match dy {
            1 => {
                if y + 1 == self.ny {
                    0
                } else {
                    y + 1
                }
            }
            -1 => {
                if y == 0 {
                    self.ny - 1
                } else {
                    y - 1
                }
            }
            _ => y,
        }
    }

    /// 周期平移后的展平索引（任意整数位移）
    ///
    /// 初始场平移与周期性测试使用，非热点路径。
    #[inline]
    pub fn idx_shifted(&self, x: usize, y: usize, sx: i64, sy: i64) -> usize {
        let nx = self.nx as i64;
        let ny = self.ny as i64;
        let xs = (x as i64 + sx).rem_euclid(nx) as usize;
        let ys = (y as i64 + sy).rem_euclid(ny) as usize;
        self.idx(xs, ys)
    }
}
