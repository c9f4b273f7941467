//! utterances comment widget
//!
//! The widget is a third-party script injected into an anchor element. The
//! emitted snippet owns that script: it mounts it once when the page is
//! ready and removes it (along with the iframe it created) on `pagehide`,
//! remounting if the page is restored from the back/forward cache.

use crate::config::CommentsConfig;

/// Id of the element the widget is injected into
pub const ANCHOR_ID: &str = "inject-comments-for-uterances";

const CLIENT_SRC: &str = "https://utteranc.es/client.js";

const LIFECYCLE_SCRIPT: &str = r#"<script>
(function() {
    var anchor = document.getElementById(__ANCHOR__);
    var script = null;
    function mount() {
        if (script || !anchor) return;
        script = document.createElement('script');
        script.setAttribute('src', __SRC__);
        script.setAttribute('crossorigin', 'anonymous');
        script.setAttribute('async', 'true');
        script.setAttribute('repo', __REPO__);
        script.setAttribute('issue-term', __ISSUE_TERM__);
        script.setAttribute('theme', __THEME__);
        anchor.appendChild(script);
    }
    function unmount() {
        if (!script) return;
        while (anchor.firstChild) anchor.removeChild(anchor.firstChild);
        script = null;
    }
    if (document.readyState === 'loading') {
        document.addEventListener('DOMContentLoaded', mount);
    } else {
        mount();
    }
    window.addEventListener('pagehide', unmount);
    window.addEventListener('pageshow', function(e) { if (e.persisted) mount(); });
})();
</script>"#;

/// Comment thread widget bound to one repository
#[derive(Debug, Clone, PartialEq)]
pub struct CommentWidget {
    pub repo: String,
    pub issue_term: String,
    pub theme: String,
}

impl CommentWidget {
    /// Widget for the configuration, if comments are enabled
    pub fn from_config(config: &CommentsConfig) -> Option<Self> {
        if !config.enable {
            return None;
        }
        if config.repo.is_empty() {
            tracing::debug!("comments.repo is not set; skipping widget");
            return None;
        }
        Some(Self {
            repo: config.repo.clone(),
            issue_term: config.issue_term.clone(),
            theme: config.theme.clone(),
        })
    }

    /// Anchor element plus its mount/unmount script
    pub fn render(&self) -> String {
        let script = LIFECYCLE_SCRIPT
            .replace("__ANCHOR__", &js_string(ANCHOR_ID))
            .replace("__SRC__", &js_string(CLIENT_SRC))
            .replace("__REPO__", &js_string(&self.repo))
            .replace("__ISSUE_TERM__", &js_string(&self.issue_term))
            .replace("__THEME__", &js_string(&self.theme));
        format!("<div id=\"{}\"></div>\n{}", ANCHOR_ID, script)
    }
}

/// Quote a value as a JavaScript string literal safe inside `<script>`
fn js_string(value: &str) -> String {
    serde_json::Value::from(value)
        .to_string()
        .replace("</", "<\\/")
}
