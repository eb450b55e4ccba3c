//! Quantity Reconciliation
//!
//! Two-state machine deciding how each accepted scan lands in the
//! ledger. Idle: no code awaiting confirmation. Pending: the last
//! scanned code got an implicit +1 and a quantity popup is open so the
//! user may overwrite it with an exact count.
//!
//! The machine consumes abstract events (new scan, confirm, skip) plus
//! the mirrored text of the quantity input, and emits `LedgerUpdate`
//! actions for the caller to apply. It has no UI or storage
//! dependencies.

/// A ledger mutation requested by the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerUpdate {
    /// Default path: one more unit of `code` (creates the item at 1).
    Increment { code: String },
    /// Override path: set `code` to exactly `quantity` (not additive).
    Override { code: String, quantity: u32 },
}

/// Result of feeding a new scan into the machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOutcome {
    /// Mutations to apply, in order.
    pub updates: Vec<LedgerUpdate>,
    /// The code the quantity popup should now show (input cleared).
    pub popup_code: String,
}

#[derive(Debug, Default)]
pub struct QuantityReconciler {
    active_code: Option<String>,
}

impl QuantityReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// The code currently awaiting confirmation, if any.
    pub fn active_code(&self) -> Option<&str> {
        self.active_code.as_deref()
    }

    /// New scan while Idle or Pending. A valid typed quantity left in
    /// the input finalizes the previous code before the new one is
    /// committed; invalid input leaves the previous implicit +1 as the
    /// final value.
    pub fn on_scan(&mut self, code: &str, typed_input: &str) -> ScanOutcome {
        let mut updates = Vec::new();
        if let Some(prev) = self.active_code.take() {
            if let Some(quantity) = parse_positive(typed_input) {
                updates.push(LedgerUpdate::Override {
                    code: prev,
                    quantity,
                });
            }
        }
        updates.push(LedgerUpdate::Increment {
            code: code.to_string(),
        });
        self.active_code = Some(code.to_string());
        ScanOutcome {
            updates,
            popup_code: code.to_string(),
        }
    }

    /// User confirmed the popup. A positive integer overwrites the
    /// pending code's quantity; anything else means "no override".
    /// Either way the machine returns to Idle.
    pub fn confirm(&mut self, typed_input: &str) -> Option<LedgerUpdate> {
        let code = self.active_code.take()?;
        let quantity = parse_positive(typed_input)?;
        Some(LedgerUpdate::Override { code, quantity })
    }

    /// User dismissed the popup; the implicit +1 stands.
    pub fn skip(&mut self) {
        self.active_code = None;
    }

    /// Clear pending state when the scanning session stops.
    pub fn reset(&mut self) {
        self.active_code = None;
    }
}

/// Strictly positive integer, or None for "no override".
fn parse_positive(input: &str) -> Option<u32> {
    match input.trim().parse::<i64>() {
        Ok(n) if n > 0 && n <= u32::MAX as i64 => Some(n as u32),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_path_single_increment() {
        let mut rec = QuantityReconciler::new();
        let out = rec.on_scan("X123", "");
        assert_eq!(
            out.updates,
            vec![LedgerUpdate::Increment {
                code: "X123".to_string()
            }]
        );
        assert_eq!(out.popup_code, "X123");
        assert_eq!(rec.active_code(), Some("X123"));

        // next scan with nothing typed: X123 keeps its implicit +1
        let out = rec.on_scan("B", "");
        assert_eq!(
            out.updates,
            vec![LedgerUpdate::Increment {
                code: "B".to_string()
            }]
        );
    }

    #[test]
    fn test_confirm_overwrites_exact_value() {
        let mut rec = QuantityReconciler::new();
        rec.on_scan("X123", "");
        let update = rec.confirm("5");
        assert_eq!(
            update,
            Some(LedgerUpdate::Override {
                code: "X123".to_string(),
                quantity: 5
            })
        );
        assert_eq!(rec.active_code(), None);
    }

    #[test]
    fn test_typed_value_finalizes_previous_on_scan() {
        let mut rec = QuantityReconciler::new();
        rec.on_scan("X123", "");
        let out = rec.on_scan("B", "7");
        assert_eq!(
            out.updates,
            vec![
                LedgerUpdate::Override {
                    code: "X123".to_string(),
                    quantity: 7
                },
                LedgerUpdate::Increment {
                    code: "B".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_invalid_input_means_no_override() {
        for bad in ["", "0", "-3", "abc", "2.5"] {
            let mut rec = QuantityReconciler::new();
            rec.on_scan("X123", "");
            assert_eq!(rec.confirm(bad), None, "input {:?}", bad);
            assert_eq!(rec.active_code(), None);
        }
    }

    #[test]
    fn test_skip_keeps_implicit_increment() {
        let mut rec = QuantityReconciler::new();
        rec.on_scan("X123", "");
        rec.skip();
        assert_eq!(rec.active_code(), None);
        assert_eq!(rec.confirm("9"), None);
    }
}
