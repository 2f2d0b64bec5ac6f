use crate::domain::{Coordinates, Listing, ListingType, User};
use crate::map::MapQuery;
use crate::templates::components::{card, format_price, notice, type_badge};
use crate::templates::desktop_layout;
use maud::{html, Markup};

pub fn property_page(user: &User, listing: &Listing, is_owner: bool, query: &MapQuery) -> Markup {
    let back = query.href("/dashboard");
    let c = listing.coordinates;

    desktop_layout(
        &format!("{} Property", listing.block_name),
        Some(user),
        html! {
            main class="container property-details-view" {
                p {
                    a href=(back) { "← Back to map" }
                    " "
                    a class="show-on-map" href=(query.focused_on(&listing.block_name, listing.id).href("/dashboard")) { "Show on map" }
                }

                div class="details-header" {
                    h1 { (listing.block_name) " Property Details" }
                    div class="details-price" { (format_price(listing.price)) }
                    (type_badge(listing.property_type))
                }

                @if let Some(video) = &listing.video_path {
                    div class="property-video" {
                        video controls preload="metadata" src=(format!("/uploads/videos/{video}")) {
                            "Your browser does not support the video tag."
                        }
                    }
                }

                div class="details-grid" {
                    (card("Property Information", html! {
                        p { strong { "Measures: " } (listing.measures) }
                        p { strong { "Bedrooms: " } (listing.bedrooms) }
                        p { strong { "Bathrooms: " } (listing.bathrooms) }
                        p { strong { "Kitchens: " } (listing.kitchens) }
                        p { strong { "Price: " } (format_price(listing.price)) }
                    }))
                    (card("Description", html! {
                        @if listing.description.is_empty() {
                            p { "No description provided." }
                        } @else {
                            p { (listing.description) }
                        }
                    }))
                    (card("Location", html! {
                        p { strong { "Block: " } (listing.block_name) }
                        p { strong { "Coordinates: " } (format!("X: {:.3}, Y: {:.3}", c.x, c.y)) }
                    }))
                    (card("Contact Information", html! {
                        p { strong { "Posted by: " } (listing.fullname) }
                        p { strong { "Date Posted: " } (listing.created_at.format("%Y-%m-%d %H:%M").to_string()) }
                    }))
                }

                @if is_owner {
                    div class="owner-actions" {
                        a class="edit-btn" href=(format!("/dashboard/properties/{}/edit", listing.id)) { "Edit" }
                        form method="post" action=(format!("/dashboard/properties/{}/delete", listing.id)) class="inline" {
                            button type="submit" class="delete-btn" { "Delete" }
                        }
                    }
                }
            }
        },
    )
}

/// Form for a listing at a spot picked on the map. The coordinates travel as
/// the same JSON string the API takes.
pub fn new_listing_page(
    user: &User,
    query: &MapQuery,
    block: &str,
    point: Coordinates,
    error: Option<&str>,
) -> Markup {
    desktop_layout(
        "Add property",
        Some(user),
        html! {
            main class="container narrow" {
                p { a href=(query.href("/dashboard")) { "← Back to map" } }
                h1 { "Add property in block " (block) }
                p class="hint" { (format!("Location: X {:.3}, Y {:.3}", point.x, point.y)) }

                @if let Some(msg) = error {
                    (notice("error", msg))
                }

                form method="post" action=(query.href("/dashboard/properties")) enctype="multipart/form-data" class="property-form" {
                    input type="hidden" name="block_name" value=(block);
                    input type="hidden" name="coordinates" value=(point.to_json());

                    label for="property_type" { "Type" }
                    select name="property_type" id="property_type" required {
                        @for t in ListingType::ALL {
                            option value=(t.as_str()) selected[query.kind == Some(t)] { (t.as_str()) }
                        }
                    }

                    label for="measures" { "Measures" }
                    input type="text" name="measures" id="measures" placeholder="e.g. 120 m²";

                    label for="bedrooms" { "Bedrooms" }
                    input type="number" name="bedrooms" id="bedrooms" min="0" value="0" required;
                    label for="bathrooms" { "Bathrooms" }
                    input type="number" name="bathrooms" id="bathrooms" min="0" value="0" required;
                    label for="kitchens" { "Kitchens" }
                    input type="number" name="kitchens" id="kitchens" min="0" value="0" required;

                    label for="price" { "Price" }
                    input type="number" name="price" id="price" min="0" step="any" required;

                    label for="description" { "Description" }
                    textarea name="description" id="description" rows="4" {}

                    label for="video" { "Video (optional)" }
                    input type="file" name="video" id="video" accept="video/*";

                    button type="submit" class="primary" { "Add Property" }
                }
            }
        },
    )
}

pub fn edit_placeholder_page(user: &User, listing: &Listing) -> Markup {
    desktop_layout(
        "Edit property",
        Some(user),
        html! {
            main class="container narrow" {
                h1 { "Edit " (listing.block_name) " Property" }
                (notice("info", "Edit functionality coming soon!"))
                p { a href=(format!("/dashboard/properties/{}", listing.id)) { "← Back to property" } }
            }
        },
    )
}
