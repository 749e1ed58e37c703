use serde::{Deserialize, Serialize};

/// The closed set of document-safe fonts that text runs may reference.
/// Every observed web font family resolves to exactly one of these; the
/// document-assembly collaborator can rely on all of them being available
/// wherever the presentation is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DocumentFont {
    Arial,
    #[default]
    Calibri,
    TimesNewRoman,
    Georgia,
    Verdana,
    CourierNew,
    SegoeUi,
}

impl DocumentFont {
    /// The font name as the document format spells it.
    pub fn name(&self) -> &'static str {
        match self {
            DocumentFont::Arial => "Arial",
            DocumentFont::Calibri => "Calibri",
            DocumentFont::TimesNewRoman => "Times New Roman",
            DocumentFont::Georgia => "Georgia",
            DocumentFont::Verdana => "Verdana",
            DocumentFont::CourierNew => "Courier New",
            DocumentFont::SegoeUi => "Segoe UI",
        }
    }
}
