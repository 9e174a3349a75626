// 数学工具系统
// 评分引擎共用的数值曲线：归一化、非对称放大、尾部压缩、软上限

use log::warn;

// 数学常量
pub mod constants {
    pub const EPSILON: f64 = 1e-9;

    // 非对称曲线的输入上限，避免在 1.0 处发散
    pub const ASYM_INPUT_CEILING: f64 = 0.9999;

    // 尾部压缩起点与最大增量
    pub const SQUASH_KNEE: f64 = 0.9;
    pub const SQUASH_HEADROOM: f64 = 0.08;
    pub const SQUASH_SCALE: f64 = 0.05;

    // 面积软上限基准（公顷）
    pub const SIZE_SOFT_CAP_HECTARES: f64 = 5.0;
}

use constants::*;

// 限制到 [0,1]；NaN 视为 0
pub fn clamp01(value: f64) -> f64 {
    if value.is_nan() {
        warn!("clamp01 收到 NaN，按 0 处理");
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

// 线性归一化到 [0,1]
pub fn normalize(value: f64, min: f64, max: f64) -> f64 {
    let span = max - min;
    if span.abs() < EPSILON {
        return if value >= max { 1.0 } else { 0.0 };
    }
    clamp01((value - min) / span)
}

pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t.clamp(0.0, 1.0)
}

// 分段非对称乘数曲线：低段近似线性，高段超线性增长
// (段起点, 段终点, 起点值, 终点值, 指数)
const ASYM_SEGMENTS: [(f64, f64, f64, f64, i32); 7] = [
    (0.0, 0.3, 1.0, 1.1, 1),
    (0.3, 0.6, 1.1, 1.3, 1),
    (0.6, 0.9, 1.3, 3.0, 2),
    (0.9, 0.95, 3.0, 5.0, 2),
    (0.95, 0.98, 5.0, 10.0, 2),
    (0.98, 0.99, 10.0, 50.0, 2),
    (0.99, 1.0, 50.0, 1000.0, 2),
];

// 将 [0,1) 映射为 ≥1 的乘数；asym(0) = 1，严格单调递增
pub fn asymmetric_multiplier(value: f64) -> f64 {
    let x = clamp01(value).min(ASYM_INPUT_CEILING);

    for &(start, end, from, to, power) in ASYM_SEGMENTS.iter() {
        if x < end {
            let t = (x - start) / (end - start);
            return from + (to - from) * t.powi(power);
        }
    }

    // x 受上限约束，不会走到这里
    ASYM_SEGMENTS[ASYM_SEGMENTS.len() - 1].3
}

// 高端尾部压缩：≤0.9 保持不变，之后指数趋近 0.98 但不到达
pub fn squash_tail(value: f64) -> f64 {
    let x = clamp01(value);
    if x <= SQUASH_KNEE {
        x
    } else {
        SQUASH_KNEE + SQUASH_HEADROOM * (1.0 - (-(x - SQUASH_KNEE) / SQUASH_SCALE).exp())
    }
}

// sqrt(hectares)，超过 sqrt(5) 后对数压缩
pub fn soft_capped_sqrt(hectares: f64) -> f64 {
    let root = hectares.max(0.0).sqrt();
    let threshold = SIZE_SOFT_CAP_HECTARES.sqrt();
    if root <= threshold {
        root
    } else {
        threshold * (1.0 + (root / threshold).ln())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp01() {
        assert_eq!(clamp01(-0.5), 0.0);
        assert_eq!(clamp01(1.5), 1.0);
        assert_eq!(clamp01(0.25), 0.25);
        assert_eq!(clamp01(f64::NAN), 0.0);
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(150.0, 100.0, 200.0), 0.5);
        assert_eq!(normalize(50.0, 100.0, 200.0), 0.0);
        assert_eq!(normalize(300.0, 100.0, 200.0), 1.0);
        // 零宽区间
        assert_eq!(normalize(100.0, 100.0, 100.0), 1.0);
    }

    #[test]
    fn test_asymmetric_multiplier_anchors() {
        assert!((asymmetric_multiplier(0.0) - 1.0).abs() < 1e-12);
        assert!((asymmetric_multiplier(0.3) - 1.1).abs() < 1e-12);
        assert!((asymmetric_multiplier(0.6) - 1.3).abs() < 1e-12);
        assert!((asymmetric_multiplier(0.9) - 3.0).abs() < 1e-12);
        assert!((asymmetric_multiplier(0.98) - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_asymmetric_multiplier_monotonic() {
        let mut previous = asymmetric_multiplier(0.0);
        for i in 1..=1000 {
            let current = asymmetric_multiplier(i as f64 / 1000.0);
            assert!(current >= previous, "curve decreased at {}", i);
            previous = current;
        }
        assert!(previous.is_finite());
    }

    #[test]
    fn test_squash_tail() {
        assert_eq!(squash_tail(0.5), 0.5);
        assert_eq!(squash_tail(0.9), 0.9);
        assert!(squash_tail(1.0) < 0.98);
        assert!(squash_tail(0.95) > 0.9);
    }

    #[test]
    fn test_soft_capped_sqrt() {
        assert!((soft_capped_sqrt(4.0) - 2.0).abs() < 1e-12);
        assert!((soft_capped_sqrt(5.0) - 5.0_f64.sqrt()).abs() < 1e-12);
        // 大面积被压缩
        assert!(soft_capped_sqrt(100.0) < 10.0);
        assert!(soft_capped_sqrt(100.0) > soft_capped_sqrt(50.0));
        assert_eq!(soft_capped_sqrt(-1.0), 0.0);
    }
}
