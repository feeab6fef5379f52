//! 可读的单据编号，例如 `INV-2026-00042`

use crate::config::FinanceConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberFormat {
    pub prefix: String,
    pub width: usize,
}

impl NumberFormat {
    pub fn new(prefix: impl Into<String>, width: usize) -> Self {
        Self {
            prefix: prefix.into(),
            width,
        }
    }

    pub fn invoices(config: &FinanceConfig) -> Self {
        Self::new(config.invoice_prefix.clone(), config.sequence_width)
    }

    pub fn receipts(config: &FinanceConfig) -> Self {
        Self::new(config.receipt_prefix.clone(), config.sequence_width)
    }

    /// `<prefix>-<year>-<sequence>`，序号按 `width` 补零。
    /// 超过 `width` 的序号保持完整。
    pub fn format(&self, year: i32, sequence: u64) -> String {
        format!(
            "{}-{}-{:0width$}",
            self.prefix,
            year,
            sequence,
            width = self.width
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invoice_number_padding() {
        let fmt = NumberFormat::new("INV", 5);
        assert_eq!(fmt.format(2026, 1), "INV-2026-00001");
        assert_eq!(fmt.format(2026, 42), "INV-2026-00042");
    }

    #[test]
    fn test_sequence_wider_than_width() {
        let fmt = NumberFormat::new("RCP", 3);
        assert_eq!(fmt.format(2025, 12345), "RCP-2025-12345");
    }

    #[test]
    fn test_from_finance_config() {
        let config = FinanceConfig {
            invoice_prefix: "INV".into(),
            receipt_prefix: "RCP".into(),
            sequence_width: 4,
        };
        assert_eq!(NumberFormat::invoices(&config).format(2026, 7), "INV-2026-0007");
        assert_eq!(NumberFormat::receipts(&config).format(2026, 7), "RCP-2026-0007");
    }
}
