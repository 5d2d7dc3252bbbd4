//! Page capability.
//!
//! The controller never talks to a webview directly. It goes through `Page`,
//! whose DOM helpers are provided methods that compile to guarded script:
//! every lookup checks that the element exists before touching it, so a page
//! missing the expected markup is a no-op rather than a script error.
//! Test fakes override the helpers with an in-memory DOM.

use url::Url;

use crate::error::ShellResult;

/// A loaded page the shell can steer.
pub trait Page {
    /// Replace the whole view with `url`.
    fn navigate(&self, url: &Url) -> ShellResult<()>;

    fn current_url(&self) -> ShellResult<Url>;

    fn set_zoom(&self, factor: f64) -> ShellResult<()>;

    /// Run `script` in the page's main frame, fire-and-forget.
    fn evaluate_script(&self, script: &str) -> ShellResult<()>;

    /// Set an inline style property on the first element matching `selector`.
    /// Absent elements are ignored and the property is only written when its
    /// current inline value differs.
    fn set_style_property(&self, selector: &str, property: &str, value: &str) -> ShellResult<()> {
        self.evaluate_script(&script::set_style_property(selector, property, value))
    }

    /// Append a `<style>` element with `css` to the document head, if any.
    fn append_style_rule(&self, css: &str) -> ShellResult<()> {
        self.evaluate_script(&script::append_style_rule(css))
    }

    /// Dispatch a bubbling, cancelable click on the first match of `selector`.
    fn dispatch_click(&self, selector: &str) -> ShellResult<()> {
        self.evaluate_script(&script::dispatch_click(selector))
    }

    /// Set `object.field = value` when the page global `object` is defined.
    fn assign_global(&self, object: &str, field: &str, value: i64) -> ShellResult<()> {
        self.evaluate_script(&script::assign_global(object, field, value))
    }

    /// Let the page navigate itself, which avoids blanking the view first.
    fn assign_location(&self, url: &Url) -> ShellResult<()> {
        self.evaluate_script(&script::assign_location(url))
    }
}

/// Script builders behind the provided `Page` helpers.
///
/// Every interpolated value goes through JSON encoding so selectors, CSS and
/// URLs can never break out of their string literal.
pub mod script {
    use url::Url;

    fn literal(value: &str) -> String {
        serde_json::Value::from(value).to_string()
    }

    pub fn set_style_property(selector: &str, property: &str, value: &str) -> String {
        format!(
            "(function() {{ var el = document.querySelector({sel}); if (!el) {{ return; }} \
             if (el.style.getPropertyValue({prop}) !== {val}) {{ el.style.setProperty({prop}, {val}); }} }})();",
            sel = literal(selector),
            prop = literal(property),
            val = literal(value),
        )
    }

    pub fn append_style_rule(css: &str) -> String {
        format!(
            "(function() {{ var head = document.querySelector('head'); if (!head) {{ return; }} \
             var s = document.createElement('style'); s.type = 'text/css'; \
             s.appendChild(document.createTextNode({css})); head.appendChild(s); }})();",
            css = literal(css),
        )
    }

    pub fn dispatch_click(selector: &str) -> String {
        format!(
            "(function() {{ var el = document.querySelector({sel}); if (!el) {{ return; }} \
             var ev = document.createEvent('MouseEvents'); ev.initEvent('click', true, true); \
             el.dispatchEvent(ev); }})();",
            sel = literal(selector),
        )
    }

    /// Names are looked up through `window[...]` rather than spliced in as
    /// identifiers.
    pub fn assign_global(object: &str, field: &str, value: i64) -> String {
        format!(
            "(function() {{ var o = window[{obj}]; if (typeof(o) != 'undefined' && o !== null) {{ o[{field}] = {value}; }} }})();",
            obj = literal(object),
            field = literal(field),
        )
    }

    pub fn assign_location(url: &Url) -> String {
        format!("window.location = {};", literal(url.as_str()))
    }

}
