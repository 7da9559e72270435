//! Dựng đường dẫn API từ template có placeholder, ví dụ
//! `/api/v1/facility/{facility_id}/patient/{id}/`.

use std::collections::BTreeMap;

use crate::CareError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Literal(String),
    Param(String),
}

/// Template đường dẫn đã phân tích.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTemplate {
    source: String,
    pieces: Vec<Piece>,
}

impl RouteTemplate {
    pub fn parse(source: &str) -> Result<Self, CareError> {
        let mut pieces = Vec::new();
        let mut literal = String::new();
        let mut chars = source.char_indices();

        while let Some((pos, ch)) = chars.next() {
            match ch {
                '{' => {
                    let mut name = String::new();
                    let mut closed = false;
                    for (_, next) in chars.by_ref() {
                        if next == '}' {
                            closed = true;
                            break;
                        }
                        name.push(next);
                    }
                    if !closed {
                        return Err(CareError::UnclosedPlaceholder(pos));
                    }
                    if !is_valid_name(&name) {
                        return Err(CareError::InvalidPlaceholder(name));
                    }
                    if !literal.is_empty() {
                        pieces.push(Piece::Literal(std::mem::take(&mut literal)));
                    }
                    pieces.push(Piece::Param(name));
                }
                '}' => return Err(CareError::UnexpectedBrace(pos)),
                other => literal.push(other),
            }
        }

        if !literal.is_empty() {
            pieces.push(Piece::Literal(literal));
        }

        Ok(Self {
            source: source.to_string(),
            pieces,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Tên placeholder theo thứ tự xuất hiện đầu tiên.
    pub fn placeholders(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for piece in &self.pieces {
            if let Piece::Param(name) = piece {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// Thay mọi placeholder bằng giá trị đã mã hóa phần trăm.
    pub fn render(&self, params: &BTreeMap<String, String>) -> Result<String, CareError> {
        let mut out = String::with_capacity(self.source.len());
        for piece in &self.pieces {
            match piece {
                Piece::Literal(text) => out.push_str(text),
                Piece::Param(name) => {
                    let value = params
                        .get(name)
                        .ok_or_else(|| CareError::MissingParam(name.clone()))?;
                    out.push_str(&urlencoding::encode(value));
                }
            }
        }
        Ok(out)
    }

    /// Như [`RouteTemplate::render`], kèm query string theo thứ tự đã cho.
    pub fn render_with_query(
        &self,
        params: &BTreeMap<String, String>,
        query: &[(String, String)],
    ) -> Result<String, CareError> {
        let mut out = self.render(params)?;
        if query.is_empty() {
            return Ok(out);
        }

        let encoded: Vec<String> = query
            .iter()
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    urlencoding::encode(key),
                    urlencoding::encode(value)
                )
            })
            .collect();
        out.push('?');
        out.push_str(&encoded.join("&"));
        Ok(out)
    }
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
