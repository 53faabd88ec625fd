//! URI template expansion for the route tables.
//!
//! Supports the two RFC6570 forms the service routes actually use: simple
//! path expansion (`{id}`) and form-style query expansion (`{?page,rpp}`).
//! Undefined path variables expand to the empty string; undefined query
//! variables are simply not emitted, so a template expanded with no
//! parameters yields a bare path with no `?`. Query values are
//! form-urlencoded; path values are substituted verbatim (stream ids are
//! slash-separated storage paths and must keep their separators).

use url::form_urlencoded;

/// A static URI template with named placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UriTemplate {
    template: &'static str,
}

impl UriTemplate {
    pub const fn new(template: &'static str) -> Self {
        Self { template }
    }

    pub fn as_str(&self) -> &'static str {
        self.template
    }

    /// Expand the template with the given `(name, value)` parameters.
    pub fn expand(&self, params: &[(&str, String)]) -> String {
        expand(self.template, params)
    }
}

/// Expand an arbitrary template string; used for templates assembled at
/// runtime, such as a HAL link href suffixed with `{?height,width}`.
pub fn expand(template: &str, params: &[(&str, String)]) -> String {
    let (path, query_vars) = match template.split_once("{?") {
        Some((path, rest)) => (path, Some(rest.trim_end_matches('}'))),
        None => (template, None),
    };

    let mut out = expand_path(path, params);

    if let Some(vars) = query_vars {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        let mut any = false;
        for name in vars.split(',') {
            if let Some((_, value)) = params.iter().find(|(key, _)| *key == name) {
                serializer.append_pair(name, value);
                any = true;
            }
        }
        if any {
            out.push('?');
            out.push_str(&serializer.finish());
        }
    }

    out
}

fn expand_path(path: &str, params: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(path.len());
    let mut rest = path;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        match rest[open..].find('}') {
            Some(close) => {
                let name = &rest[open + 1..open + close];
                if let Some((_, value)) = params.iter().find(|(key, _)| *key == name) {
                    out.push_str(value);
                }
                rest = &rest[open + close + 1..];
            }
            // Unbalanced brace; keep the remainder as-is.
            None => {
                out.push_str(&rest[open..]);
                return out;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(name: &'static str, value: &str) -> (&'static str, String) {
        (name, value.to_string())
    }

    #[test]
    fn path_variable_is_substituted() {
        let template = UriTemplate::new("files/{id}/{?embed,fields}");
        assert_eq!(template.expand(&[p("id", "abc")]), "files/abc/");
    }

    #[test]
    fn undefined_path_variable_expands_to_empty() {
        let template = UriTemplate::new("files/{id}/{?embed,fields}");
        assert_eq!(template.expand(&[]), "files//");
    }

    #[test]
    fn query_parameters_only_emit_supplied_values() {
        let template = UriTemplate::new("files/{?searchQuery,page,rpp,sort,embed,fields}");
        assert_eq!(
            template.expand(&[p("page", "2"), p("rpp", "10")]),
            "files/?page=2&rpp=10"
        );
    }

    #[test]
    fn no_query_parameters_yields_bare_path() {
        let template = UriTemplate::new("files/{?searchQuery,page,rpp,sort,embed,fields}");
        assert_eq!(template.expand(&[]), "files/");
    }

    #[test]
    fn query_values_are_urlencoded() {
        let template = UriTemplate::new("files/{?searchQuery,page}");
        assert_eq!(
            template.expand(&[p("searchQuery", "annual report")]),
            "files/?searchQuery=annual+report"
        );
    }

    #[test]
    fn query_parameter_order_follows_template() {
        let template = UriTemplate::new("files/batch/{?width,height}");
        assert_eq!(
            template.expand(&[p("height", "100"), p("width", "200")]),
            "files/batch/?width=200&height=100"
        );
    }

    #[test]
    fn path_values_keep_slashes() {
        let template = UriTemplate::new("file-streams/{path}");
        assert_eq!(
            template.expand(&[p("path", "docs/report.pdf")]),
            "file-streams/docs/report.pdf"
        );
    }

    #[test]
    fn multiple_path_variables() {
        let template =
            UriTemplate::new("files/{id}/acl/actions/{accessAction}/users/{user}/");
        assert_eq!(
            template.expand(&[p("id", "1"), p("accessAction", "read"), p("user", "ana")]),
            "files/1/acl/actions/read/users/ana/"
        );
    }

    #[test]
    fn runtime_template_expansion() {
        let href = "files/42";
        let expanded = expand(
            &format!("{href}{{?height,width}}"),
            &[p("width", "64"), p("height", "48")],
        );
        assert_eq!(expanded, "files/42?height=48&width=64");
    }
}
