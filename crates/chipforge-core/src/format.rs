//! Human-readable numbers for the presentation layer.

use crate::big::Big;

const NUMBER_SUFFIXES: [(f64, &str); 5] = [
    (1e3, "K"),
    (1e6, "M"),
    (1e9, "B"),
    (1e12, "T"),
    (1e15, "P"),
];

const FLOPS_UNITS: [(f64, &str); 6] = [
    (1e3, "KFLOPS"),
    (1e6, "MFLOPS"),
    (1e9, "GFLOPS"),
    (1e12, "TFLOPS"),
    (1e15, "PFLOPS"),
    (1e18, "EFLOPS"),
];

/// `<mantissa>e<exponent>` with `digits` decimals, e.g. `1.23e20`.
pub fn exponential(value: Big, digits: usize) -> String {
    let (mantissa, mut exponent) = value.to_parts();
    let mut text = format!("{mantissa:.digits$}");
    // Rounding may carry 9.999 up to 10.00.
    if text.starts_with("10") {
        text = format!("{:.digits$}", mantissa / 10.0);
        exponent += 1;
    }
    format!("{text}e{exponent}")
}

/// Compact count: `7.5`, `512`, `1.5K` … `2.0P`, then `1.23e18`.
pub fn format_number(n: Big) -> String {
    let v = n.to_f64();
    if v < 1e3 {
        return if v < 10.0 {
            format!("{v:.1}")
        } else {
            format!("{v:.0}")
        };
    }
    for &(scale, suffix) in NUMBER_SUFFIXES.iter().rev() {
        if v >= scale && v < scale * 1e3 {
            return format!("{:.1}{suffix}", v / scale);
        }
    }
    exponential(n, 2)
}

/// FLOPS with SI prefixes at powers of 1000, up to ZFLOPS.
pub fn format_flops(flops: Big) -> String {
    let v = flops.to_f64();
    if v < 1e3 {
        return format!("{v:.0} FLOPS");
    }
    for &(scale, unit) in FLOPS_UNITS.iter().rev() {
        if v >= scale && v < scale * 1e3 {
            return format!("{:.2} {unit}", v / scale);
        }
    }
    let zetta = flops / Big::from_f64(1e21);
    if zetta < Big::from_f64(1e6) {
        format!("{:.2} ZFLOPS", zetta.to_f64())
    } else {
        format!("{} ZFLOPS", exponential(zetta, 2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(v: f64) -> Big {
        Big::from_f64(v)
    }

    #[test]
    fn small_numbers() {
        assert_eq!(format_number(Big::ZERO), "0.0");
        assert_eq!(format_number(n(5.0)), "5.0");
        assert_eq!(format_number(n(42.4)), "42");
        assert_eq!(format_number(n(999.0)), "999");
    }

    #[test]
    fn suffixed_numbers() {
        assert_eq!(format_number(n(1_500.0)), "1.5K");
        assert_eq!(format_number(n(2.5e6)), "2.5M");
        assert_eq!(format_number(n(3e9)), "3.0B");
        assert_eq!(format_number(n(1e12)), "1.0T");
        assert_eq!(format_number(n(4.2e15)), "4.2P");
    }

    #[test]
    fn exponential_numbers() {
        assert_eq!(format_number(n(1.234e20)), "1.23e20");
        assert_eq!(format_number("5e400".parse().unwrap()), "5.00e400");
        assert_eq!(exponential(n(9.999e30), 2), "1.00e31");
    }

    #[test]
    fn flops_units() {
        assert_eq!(format_flops(n(500.0)), "500 FLOPS");
        assert_eq!(format_flops(n(1_500.0)), "1.50 KFLOPS");
        assert_eq!(format_flops(n(1e9)), "1.00 GFLOPS");
        assert_eq!(format_flops(n(3e18)), "3.00 EFLOPS");
    }

    #[test]
    fn zetta_flops() {
        assert_eq!(format_flops("2.5e21".parse().unwrap()), "2.50 ZFLOPS");
        assert_eq!(format_flops("1e300".parse().unwrap()), "1.00e279 ZFLOPS");
    }
}
