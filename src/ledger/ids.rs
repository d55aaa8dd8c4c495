use chrono::{DateTime, Utc};

/// `PAY-<unix-millis>-<seq>`; the middle token becomes the receipt number
pub fn payment_id(at: DateTime<Utc>, seq: usize) -> String {
    format!("PAY-{}-{}", at.timestamp_millis(), seq)
}

pub fn sale_id(at: DateTime<Utc>, seq: usize) -> String {
    format!("VTA-{}-{}", at.timestamp_millis(), seq)
}

pub fn credit_id(at: DateTime<Utc>, seq: usize) -> String {
    format!("CRE-{}-{}", at.timestamp_millis(), seq)
}

pub fn commission_record_id(at: DateTime<Utc>, seq: usize) -> String {
    format!("COM-{}-{}", at.timestamp_millis(), seq)
}

/// Expand a credit code template such as `CR-{seq:04}`
pub fn format_credit_code(format: &str, year: i32, seq: u32) -> String {
    format
        .replace("{year}", &year.to_string())
        .replace("{seq:05}", &format!("{:05}", seq))
        .replace("{seq:04}", &format!("{:04}", seq))
        .replace("{seq:03}", &format!("{:03}", seq))
        .replace("{seq}", &seq.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn payment_id_embeds_millis() {
        let at = Utc.timestamp_millis_opt(16899001234).unwrap();
        assert_eq!(payment_id(at, 3), "PAY-16899001234-3");
        assert_eq!(sale_id(at, 2), "VTA-16899001234-2");
        assert_eq!(credit_id(at, 1), "CRE-16899001234-1");
    }

    #[test]
    fn credit_code_template() {
        assert_eq!(format_credit_code("CR-{seq:04}", 2026, 7), "CR-0007");
        assert_eq!(format_credit_code("{year}/{seq}", 2026, 12), "2026/12");
    }
}
