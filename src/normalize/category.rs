//! Category-driven character filter
//!
//! Each character is classified by its Unicode general category and looked
//! up in [`NAME_FORM`]. Categories absent from the table are kept, which
//! covers letters and decimal digits.

use unicode_general_category::{get_general_category, GeneralCategory};

/// What to do with a character of a given category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryAction {
    /// Drop the character
    Delete,
    /// Replace the character with a single space
    Whitespace,
    /// Keep the character unchanged
    Keep,
}

/// Category table applied to transliterated names and query text.
pub const NAME_FORM: &[(GeneralCategory, CategoryAction)] = &[
    // Other
    (GeneralCategory::Control, CategoryAction::Delete),
    (GeneralCategory::Format, CategoryAction::Delete),
    (GeneralCategory::Surrogate, CategoryAction::Delete),
    (GeneralCategory::PrivateUse, CategoryAction::Delete),
    (GeneralCategory::Unassigned, CategoryAction::Delete),
    // Modifier letters and marks
    (GeneralCategory::ModifierLetter, CategoryAction::Delete),
    (GeneralCategory::NonspacingMark, CategoryAction::Delete),
    (GeneralCategory::SpacingMark, CategoryAction::Whitespace),
    (GeneralCategory::EnclosingMark, CategoryAction::Delete),
    // Numbers
    (GeneralCategory::OtherNumber, CategoryAction::Delete),
    // Separators
    (GeneralCategory::SpaceSeparator, CategoryAction::Delete),
    (GeneralCategory::LineSeparator, CategoryAction::Delete),
    (GeneralCategory::ParagraphSeparator, CategoryAction::Delete),
    // Punctuation
    (GeneralCategory::ConnectorPunctuation, CategoryAction::Delete),
    (GeneralCategory::DashPunctuation, CategoryAction::Delete),
    (GeneralCategory::OpenPunctuation, CategoryAction::Delete),
    (GeneralCategory::ClosePunctuation, CategoryAction::Delete),
    (GeneralCategory::InitialPunctuation, CategoryAction::Delete),
    (GeneralCategory::FinalPunctuation, CategoryAction::Delete),
    (GeneralCategory::OtherPunctuation, CategoryAction::Delete),
    // Symbols
    (GeneralCategory::MathSymbol, CategoryAction::Delete),
    (GeneralCategory::CurrencySymbol, CategoryAction::Delete),
    (GeneralCategory::ModifierSymbol, CategoryAction::Delete),
    (GeneralCategory::OtherSymbol, CategoryAction::Delete),
];

/// Look up the action for a character in `table`.
pub fn action_for(table: &[(GeneralCategory, CategoryAction)], c: char) -> CategoryAction {
    let category = get_general_category(c);
    table
        .iter()
        .find(|(cat, _)| *cat == category)
        .map(|(_, action)| *action)
        .unwrap_or(CategoryAction::Keep)
}

/// Apply a category table to `text`.
pub fn category_replace(text: &str, table: &[(GeneralCategory, CategoryAction)]) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match action_for(table, c) {
            CategoryAction::Delete => {}
            CategoryAction::Whitespace => out.push(' '),
            CategoryAction::Keep => out.push(c),
        }
    }
    out
}
