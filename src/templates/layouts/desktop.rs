use crate::domain::User;
use maud::{html, Markup, DOCTYPE};

pub fn desktop_layout(title: &str, user: Option<&User>, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " | Block Listings" }
                link rel="icon" href="/images/favicon.ico";
                link rel="stylesheet" href="/css/style.css";
            }
            body {
              header class="topbar" {
                  svg
                      xmlns="http://www.w3.org/2000/svg"
                      width="24"
                      height="24"
                      viewBox="0 0 24 24"
                      fill="none"
                      stroke="#524ed2"
                      stroke-width="2"
                      stroke-linecap="round"
                      stroke-linejoin="round"
                  {
                      path stroke="none" d="M0 0h24v24H0z" fill="none" {}
                      path d="M5 12l-2 0l9 -9l9 9l-2 0" {}
                      path d="M5 12v7a2 2 0 0 0 2 2h10a2 2 0 0 0 2 -2v-7" {}
                      path d="M9 21v-6a2 2 0 0 1 2 -2h2a2 2 0 0 1 2 2v6" {}
                  }
                  h3 { "Block Listings" }
                  @if let Some(user) = user {
                      nav class="user-nav" {
                          @if let Some(photo) = &user.photo {
                              img class="avatar" src=(format!("/uploads/photos/{photo}")) alt="";
                          }
                          span class="user-name" { (user.fullname) }
                          a href="/dashboard" { "Dashboard" }
                          form method="post" action="/logout" class="inline" {
                              button type="submit" class="link-btn" { "Logout" }
                          }
                      }
                  } @else {
                      a href="/" { "Sign in" }
                  }
              }
                (content)
            }
        }
    }
}
