/// Name of the missingness indicator for `column`.
pub fn indicator_name(prefix: &str, column: &str) -> String {
    format!("{prefix}{column}")
}

/// Name of the one-hot column for `level` of `column`.
///
/// The level label is sanitized so the result stays a plain identifier:
/// `cp` level `1` gives `cp_1`, `thal` level `fixed defect` gives
/// `thal_fixed_defect`, and a negative level `-1` gives `x_neg1`.
pub fn level_column_name(column: &str, level: &str) -> String {
    format!("{column}_{}", sanitize_level(level))
}

/// One-hot column names for `levels` of `column`, in level order.
///
/// Distinct levels can sanitize to the same text (`low risk` and `low-risk`);
/// later ones take the first free `_2`, `_3`, ... suffix so every level keeps
/// a column of its own.
pub fn level_column_names(column: &str, levels: &[String]) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(levels.len());
    for level in levels {
        let base = level_column_name(column, level);
        let mut name = base.clone();
        let mut suffix = 2;
        while names.contains(&name) {
            name = format!("{base}_{suffix}");
            suffix += 1;
        }
        names.push(name);
    }
    names
}

fn sanitize_level(level: &str) -> String {
    let trimmed = level.trim();
    let (sign, body) = match trimmed.strip_prefix('-') {
        Some(rest) => ("neg", rest),
        None => ("", trimmed),
    };

    let mut result = String::from(sign);
    let mut last_was_underscore = false;
    for c in body.chars() {
        if c.is_alphanumeric() {
            result.push(c);
            last_was_underscore = false;
        } else if !last_was_underscore {
            result.push('_');
            last_was_underscore = true;
        }
    }

    let result = result.trim_matches('_');
    if result.is_empty() {
        "blank".to_owned()
    } else {
        result.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indicator_name() {
        assert_eq!(indicator_name("miss_", "oldpeak"), "miss_oldpeak");
    }

    #[test]
    fn test_level_column_names() {
        assert_eq!(level_column_name("cp", "1"), "cp_1");
        assert_eq!(level_column_name("oldpeak", "1.5"), "oldpeak_1_5");
        assert_eq!(level_column_name("thal", " fixed defect "), "thal_fixed_defect");
        assert_eq!(level_column_name("x", "-1"), "x_neg1");
        assert_eq!(level_column_name("x", "  "), "x_blank");
    }

    #[test]
    fn test_alike_levels_get_distinct_names() {
        let levels = ["high", "low risk", "low-risk", "low_risk_2"].map(str::to_owned);
        assert_eq!(
            level_column_names("risk", &levels),
            vec!["risk_high", "risk_low_risk", "risk_low_risk_2", "risk_low_risk_2_2"]
        );
    }
}
