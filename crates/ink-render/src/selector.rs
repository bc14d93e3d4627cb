use crate::RenderError;

/// A single compound CSS selector (`div`, `.container`, `#main`,
/// `div.weather.today`), enough to recognise a page's ready marker in a
/// serialized DOM. For descendant selectors only the last compound is used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadySelector {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

impl ReadySelector {
    pub fn parse(selector: &str) -> Result<Self, RenderError> {
        let compound = selector
            .split(|c: char| c.is_whitespace() || c == '>' || c == '+' || c == '~')
            .filter(|s| !s.is_empty())
            .last()
            .ok_or_else(|| RenderError::InvalidRequest("empty ready selector".to_string()))?;

        if compound.contains(['[', ':', '*', ',']) {
            return Err(RenderError::InvalidRequest(format!(
                "unsupported ready selector: {selector}"
            )));
        }

        let invalid = || RenderError::InvalidRequest(format!("invalid ready selector: {selector}"));

        let first_marker = compound.find(['.', '#']).unwrap_or(compound.len());
        let tag = (first_marker > 0).then(|| compound[..first_marker].to_ascii_lowercase());
        let mut id = None;
        let mut classes = Vec::new();
        let mut rest = &compound[first_marker..];
        while let Some(marker) = rest.chars().next() {
            let body = &rest[1..];
            let end = body.find(['.', '#']).unwrap_or(body.len());
            let name = &body[..end];
            if name.is_empty() {
                return Err(invalid());
            }
            if marker == '.' {
                classes.push(name.to_string());
            } else {
                id = Some(name.to_string());
            }
            rest = &body[end..];
        }

        Ok(Self { tag, id, classes })
    }

    /// Whether any element in `html` matches.
    pub fn matches(&self, html: &str) -> bool {
        start_tags(html).any(|element| self.matches_element(element))
    }

    fn matches_element(&self, element: &str) -> bool {
        let name_end = element
            .find(|c: char| c.is_whitespace() || c == '/')
            .unwrap_or(element.len());
        if let Some(tag) = &self.tag {
            if !element[..name_end].eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        let attrs = &element[name_end..];
        if let Some(id) = &self.id {
            if attribute(attrs, "id") != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.is_empty() {
            let Some(class_attr) = attribute(attrs, "class") else {
                return false;
            };
            let present: Vec<&str> = class_attr.split_whitespace().collect();
            if !self.classes.iter().all(|c| present.contains(&c.as_str())) {
                return false;
            }
        }
        true
    }
}

/// Contents of each `<name ...>` start tag, without the angle brackets.
fn start_tags(html: &str) -> impl Iterator<Item = &str> {
    html.split('<').skip(1).filter_map(|chunk| {
        if !chunk.starts_with(|c: char| c.is_ascii_alphabetic()) {
            return None;
        }
        Some(chunk.split_once('>').map_or(chunk, |(tag, _)| tag))
    })
}

/// Value of attribute `name` in a start tag's attribute text. Quoted values
/// are skipped whole, so markers inside other attributes never match.
fn attribute<'a>(attrs: &'a str, name: &str) -> Option<&'a str> {
    let mut rest = attrs;
    loop {
        rest = rest.trim_start_matches(|c: char| c.is_whitespace() || c == '/');
        if rest.is_empty() {
            return None;
        }
        let key_end = rest
            .find(|c: char| c.is_whitespace() || c == '=' || c == '/')
            .unwrap_or(rest.len());
        let key = &rest[..key_end];
        rest = rest[key_end..].trim_start();

        let mut value = "";
        if let Some(after) = rest.strip_prefix('=') {
            let after = after.trim_start();
            match after.chars().next() {
                Some(quote @ ('"' | '\'')) => {
                    let body = &after[1..];
                    let end = body.find(quote).unwrap_or(body.len());
                    value = &body[..end];
                    rest = body.get(end + 1..).unwrap_or("");
                }
                _ => {
                    let end = after.find(char::is_whitespace).unwrap_or(after.len());
                    value = &after[..end];
                    if end == after.len() {
                        // `<span class=temp/>`
                        value = value.trim_end_matches('/');
                    }
                    rest = &after[end..];
                }
            }
        }

        if key.eq_ignore_ascii_case(name) {
            return Some(value);
        }
    }
}
