use crate::classify::{ClassifiedParams, Field, FieldMark};

const INDENT: &str = "  ";

/// Depth of the children of `request:` in the case skeleton.
pub const REQUEST_DEPTH: usize = 3;

/// A labeled list of fields, e.g. `params:` followed by its placeholders.
#[derive(Debug, Clone)]
pub struct Section<'a> {
    pub label: &'static str,
    pub fields: &'a [Field],
}

impl Section<'_> {
    fn write_to(&self, out: &mut Vec<String>, depth: usize) {
        out.push(format!("{}{}:", INDENT.repeat(depth), self.label));
        let field_indent = INDENT.repeat(depth + 1);
        for field in self.fields {
            // Later fields of a sequence item line up under the first one, after `- `.
            let align = match field.mark {
                FieldMark::SequenceItem => INDENT,
                FieldMark::Plain | FieldMark::SequenceStart => "",
            };
            out.push(format!("{field_indent}{align}{field}"));
        }
    }
}

/// The parameter part of a request: an ordered list of sections that omits the
/// empty ones and owns all indentation.
#[derive(Debug, Clone, Default)]
pub struct RequestBlock<'a> {
    sections: Vec<Section<'a>>,
}

impl<'a> RequestBlock<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Query, body and upload sections, in that order.
    pub fn from_params(params: &'a ClassifiedParams) -> Self {
        Self::new()
            .section("params", &params.query)
            .section("body", &params.body)
            .section("upload", &params.form)
    }

    pub fn section(mut self, label: &'static str, fields: &'a [Field]) -> Self {
        self.sections.push(Section { label, fields });
        self
    }

    /// Render the non-empty sections with headers at `depth`. Returns an empty
    /// string when every section is empty; never starts or ends with a newline.
    pub fn render(&self, depth: usize) -> String {
        let mut lines = Vec::new();
        for section in self.sections.iter().filter(|s| !s.fields.is_empty()) {
            section.write_to(&mut lines, depth);
        }
        lines.join("\n")
    }
}
