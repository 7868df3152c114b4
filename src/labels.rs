use itertools::Itertools;

const NUMERALS: [(usize, &str); 13] = [
    (1000, "M"),
    (900, "CM"),
    (500, "D"),
    (400, "CD"),
    (100, "C"),
    (90, "XC"),
    (50, "L"),
    (40, "XL"),
    (10, "X"),
    (9, "IX"),
    (5, "V"),
    (4, "IV"),
    (1, "I"),
];

/// Roman numeral for `n`; zero has no numeral and maps to an empty string.
pub fn to_roman(mut n: usize) -> String {
    let mut out = String::new();
    for &(value, numeral) in NUMERALS.iter() {
        while n >= value {
            out.push_str(numeral);
            n -= value;
        }
    }
    out
}

/// Roman labels `I..` for `count` consecutive formats.
pub fn roman_labels(count: usize) -> Vec<String> {
    (1..=count).map(to_roman).collect()
}

const DARK: [&str; 4] = ["#FF0000", "#00FF00", "#0000FF", "#FF00FF"];
const LIGHT: [&str; 4] = ["#FF7F7F", "#7FFF7F", "#7F7FFF", "#FF7FFF"];

/// Grey used for aggregate columns such as the geometric mean.
pub const AGGREGATE_COLOR: &str = "#7F7F7F";

/// Colour of a model's series, cycling through the palette.
pub fn model_color(model_idx: usize, highlighted: bool) -> &'static str {
    let palette = if highlighted { &DARK } else { &LIGHT };
    palette[model_idx % palette.len()]
}

/// Model name as shown in reports.
pub fn display_model(name: &str, suffix: &str) -> String {
    if suffix.is_empty() {
        return name.to_string();
    }
    name.replace(suffix, "")
}

/// Positions of `labels` ordered by label length; equal lengths keep their
/// original order.
pub fn order_by_label_length<S: AsRef<str>>(labels: &[S]) -> Vec<usize> {
    (0..labels.len())
        .sorted_by_key(|&i| labels[i].as_ref().len())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roman_numerals() {
        let cases = [(1, "I"), (4, "IV"), (9, "IX"), (14, "XIV"), (20, "XX"), (40, "XL"), (1994, "MCMXCIV")];
        for (n, expected) in cases {
            assert_eq!(to_roman(n), expected);
        }
        assert_eq!(to_roman(0), "");
        assert_eq!(roman_labels(3), vec!["I", "II", "III"]);
    }

    #[test]
    fn large_counts_keep_counting() {
        let labels = roman_labels(4_000);
        assert_eq!(labels.len(), 4_000);
        assert_eq!(labels[3_999], "MMMM");
        assert_eq!(to_roman(66_536), "M".repeat(66) + "DXXXVI");
    }

    #[test]
    fn model_names() {
        assert_eq!(display_model("san-miguel-low-poly", "-low-poly"), "san-miguel");
        assert_eq!(display_model("sponza", "-low-poly"), "sponza");
        assert_eq!(display_model("sponza", ""), "sponza");
    }

    #[test]
    fn palette_cycles() {
        assert_eq!(model_color(0, true), "#FF0000");
        assert_eq!(model_color(5, false), "#7FFF7F");
    }

    #[test]
    fn tick_order_is_stable() {
        let labels = ["SVO(3) SVDAG(8)", "SVO(11)", "SVDAG(11)", "SVO(5) SVDAG(6)"];
        assert_eq!(order_by_label_length(&labels), vec![1, 2, 0, 3]);
    }
}
