use maud::{html, Markup};

use crate::domain::{Listing, ListingType};
use crate::map::MapQuery;

pub fn card(title: &str, body: Markup) -> Markup {
    html! {
        div class="card" {
            h2 { (title) }
            div class="card-body" {
                (body)
            }
        }
    }
}

pub fn type_badge(kind: ListingType) -> Markup {
    html! {
        span class=(format!("property-type-badge {kind}")) style=(format!("background: {}", kind.color())) {
            (kind.as_str().to_uppercase())
        }
    }
}

/// `1234567.5` → `$1,234,567.50`; whole amounts drop the cents.
pub fn format_price(price: f64) -> String {
    let cents = (price * 100.0).round() as i64;
    let (whole, frac) = (cents / 100, cents % 100);

    let digits = whole.to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if frac == 0 {
        format!("${grouped}")
    } else {
        format!("${grouped}.{frac:02}")
    }
}

/// One listing in the dashboard grid/list. The owner gets edit/delete.
pub fn listing_card(listing: &Listing, is_owner: bool, query: &MapQuery) -> Markup {
    let detail = query.href(&format!("/dashboard/properties/{}", listing.id));

    html! {
        article class="property-card" data-id=(listing.id) {
            div class="property-image" {
                (type_badge(listing.property_type))
                div class="property-price" { (format_price(listing.price)) }
            }
            div class="property-content" {
                div class="property-header" {
                    h3 { a href=(detail) { (listing.block_name) " Property" } }
                    @if !listing.measures.is_empty() {
                        div class="property-measures" { (listing.measures) }
                    }
                }
                div class="property-details" {
                    (detail_item(listing.bedrooms, "Bedrooms"))
                    (detail_item(listing.bathrooms, "Bathrooms"))
                    (detail_item(listing.kitchens, "Kitchens"))
                }
                @if !listing.description.is_empty() {
                    p class="property-description" { (listing.description) }
                }
                @if is_owner {
                    div class="property-card-actions" {
                        a class="edit-btn" href=(format!("/dashboard/properties/{}/edit", listing.id)) { "Edit" }
                        form method="post" action=(format!("/dashboard/properties/{}/delete", listing.id)) class="inline" {
                            button type="submit" class="delete-btn" { "Delete" }
                        }
                    }
                }
                a class="show-on-map" href=(query.focused_on(&listing.block_name, listing.id).href("/dashboard")) { "Show on map" }
                div class="property-footer" {
                    span { "Posted by: " (listing.fullname) }
                    span { (listing.created_at.format("%Y-%m-%d").to_string()) }
                }
            }
        }
    }
}

fn detail_item(value: i64, label: &str) -> Markup {
    html! {
        div class="detail-item" {
            span class="detail-value" { (value) }
            span class="detail-label" { (label) }
        }
    }
}
