pub mod time;

/// 地球平均半径 (km)
const EARTH_RADIUS_KM: f64 = 6371.0;

/// # Summary
/// 按十进制位数四舍五入。
///
/// # Arguments
/// * `value` - 原始值。
/// * `places` - 保留的小数位数。
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// `part / whole`，`whole` 为 0 时返回 0
#[allow(clippy::cast_precision_loss)]
pub fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64
}

/// # Summary
/// 计算 `part / whole` 的百分比并保留一位小数，`whole` 为 0 时返回 0。
pub fn percentage(part: usize, whole: usize) -> f64 {
    round_to(ratio(part, whole) * 100.0, 1)
}

/// # Summary
/// 按比例折算数量并向下取整，`rate` 取值 `[0, 1]`。
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn scaled_count(total: usize, rate: f64) -> usize {
    (total as f64 * rate.clamp(0.0, 1.0)).floor() as usize
}

/// # Summary
/// Haversine 公式计算两点间的大圆距离。
///
/// # Logic
/// 1. 经纬度转为弧度。
/// 2. 代入 haversine 公式求圆心角。
/// 3. 乘以地球半径并保留两位小数。
///
/// # Returns
/// 距离 (km)。
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (lat1, lon1, lat2, lon2) = (
        lat1.to_radians(),
        lon1.to_radians(),
        lat2.to_radians(),
        lon2.to_radians(),
    );
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;
    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();
    round_to(c * EARTH_RADIUS_KM, 2)
}

/// # Summary
/// 安装进程级 rustls 加密后端 (ring)。
///
/// # Invariants
/// - 幂等：重复调用时保留第一次安装的后端。
pub fn install_crypto_provider() {
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        tracing::debug!("rustls crypto provider already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(3.14159, 2), 3.14);
        assert_eq!(round_to(2.25, 1), 2.3);
    }

    #[test]
    fn test_percentage_of_empty() {
        assert_eq!(percentage(3, 0), 0.0);
        assert_eq!(percentage(1, 3), 33.3);
    }

    #[test]
    fn test_scaled_count_floors() {
        assert_eq!(scaled_count(24, 0.95), 22);
        assert_eq!(scaled_count(24, 1.0), 24);
        assert_eq!(scaled_count(0, 0.9), 0);
    }

    #[test]
    fn test_haversine_known_distance() {
        // Nairobi -> New York
        let d = haversine_km(-1.2921, 36.8219, 40.7128, -74.0060);
        assert!((d - 11_830.0).abs() < 30.0, "got {}", d);
        assert_eq!(haversine_km(10.0, 10.0, 10.0, 10.0), 0.0);
    }
}
