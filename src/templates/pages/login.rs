use crate::templates::{components::notice, desktop_layout};
use maud::{html, Markup};

/// Sign-in and sign-up side by side. `error` is shown above both forms.
pub fn login_page(error: Option<&str>) -> Markup {
    desktop_layout(
        "Sign in",
        None,
        html! {
            main class="container narrow" {
                h1 { "Welcome" }
                p class="lead" { "Find and post properties on the block maps." }

                @if let Some(msg) = error {
                    (notice("error", msg))
                }

                div class="auth-forms" {
                    section class="card" id="login" {
                        h2 { "Sign in" }
                        form method="post" action="/login" {
                            label for="login-email" { "Email" }
                            input type="email" id="login-email" name="email" autocomplete="email" required;
                            label for="login-password" { "Password" }
                            input type="password" id="login-password" name="password" autocomplete="current-password" required;
                            button type="submit" class="primary" { "Login" }
                        }
                    }

                    section class="card" id="register" {
                        h2 { "Create account" }
                        form method="post" action="/register" enctype="multipart/form-data" {
                            label for="reg-fullname" { "Full name" }
                            input type="text" id="reg-fullname" name="fullname" autocomplete="name" required;
                            label for="reg-email" { "Email" }
                            input type="email" id="reg-email" name="email" autocomplete="email" required;
                            label for="reg-password" { "Password" }
                            input type="password" id="reg-password" name="password" minlength="6" autocomplete="new-password" required;
                            label for="reg-photo" { "Photo (optional)" }
                            input type="file" id="reg-photo" name="photo" accept="image/*";
                            button type="submit" class="primary" { "Register" }
                        }
                    }
                }
            }
        },
    )
}
