use maud::{html, Markup, DOCTYPE};

/// Standalone error page; does not depend on who is signed in.
pub fn error_page(status: u16, message: &str) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                title { "Error " (status) }
                link rel="stylesheet" href="/css/style.css";
            }
            body class="error-page" {
                h1 { "Error " (status) }
                p { (message) }
                p { a href="/dashboard" { "← Back to dashboard" } }
            }
        }
    }
}

/// Inline message box, e.g. a failed form submit.
pub fn notice(kind: &str, message: &str) -> Markup {
    html! {
        div class=(format!("notice notice-{kind}")) role="alert" { (message) }
    }
}
