//! Yes/no confirmation supplied by the caller of a destructive action.

pub trait Confirmation: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirmation for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// An answer the user already gave, e.g. on a confirmation page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Answered(pub bool);

impl Confirmation for Answered {
    fn confirm(&self, _prompt: &str) -> bool {
        self.0
    }
}

/// Prompt shown before deleting an invoice.
pub fn delete_prompt(invoice_id: &str) -> String {
    format!("Delete invoice {}? This cannot be undone.", invoice_id)
}
