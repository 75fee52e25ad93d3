//! Survey exports shared by the integration tests.

#![allow(dead_code)]

pub const QUANTITATIVE: &[&str] = &["Q30", "Q39_1", "Q55", "Q53", "Q49", "Q6", "Q16"];
pub const FREE_TEXT: &[&str] = &["Q32", "Q36", "Q38", "Q45", "Q50", "Q56", "Q59", "Q9"];

/// Ten responses covering every field of the built-in plan; rows 4 and 9
/// are unfinished.
pub fn survey_csv() -> String {
    let mut header: Vec<&str> = vec!["ResponseId", "Finished", "Q29"];
    header.extend(QUANTITATIVE);
    header.extend(FREE_TEXT);
    let mut out = header.join(",");
    out.push('\n');
    for i in 0..10usize {
        let finished = if i == 3 || i == 8 { "0" } else { "1" };
        let outcome = i % 5 + 1;
        let ordinal = |shift: usize| ((i + shift) % 5 + 1).to_string();
        let yes_no = |flag: bool| if flag { "Yes" } else { "No" };
        let enrollment = if i % 2 == 0 { "Full-time" } else { "Part-time" };
        let mut row = vec![
            format!("R_{i}"),
            finished.to_string(),
            outcome.to_string(),
            ordinal(0),
            ordinal(1),
            ordinal(2),
            yes_no(outcome >= 3).to_string(),
            yes_no(i % 3 == 0).to_string(),
            ordinal(4),
            enrollment.to_string(),
        ];
        row.extend(FREE_TEXT.iter().map(|_| "some thoughts".to_string()));
        out.push_str(&row.join(","));
        out.push('\n');
    }
    out
}
