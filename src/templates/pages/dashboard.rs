use crate::domain::{Listing, ListingStats, ListingType, User};
use crate::map::{DashboardState, MapQuery, ViewMode};
use crate::templates::components::{listing_card, map_view, notice};
use crate::templates::desktop_layout;
use maud::{html, Markup};

pub struct DashboardVm<'a> {
    pub user: &'a User,
    pub blocks: &'a [String],
    pub state: &'a DashboardState,
    pub query: &'a MapQuery,
    /// Cards under the map: the block's listings, or the recent ones when
    /// no block is selected.
    pub listings: &'a [Listing],
    pub stats: ListingStats,
    pub container_height: f64,
    pub notice: Option<&'a str>,
}

pub fn dashboard_page(vm: &DashboardVm) -> Markup {
    desktop_layout(
        "Dashboard",
        Some(vm.user),
        html! {
            main class="container" {
                h1 { "Dashboard" }
                p { "Signed in as " strong { (vm.user.fullname) } }

                @if let Some(msg) = vm.notice {
                    (notice("info", msg))
                }

                (stats_bar(&vm.stats))
                (filters(vm))

                section class="map-section" {
                    (map_view(vm.state, vm.query, vm.container_height))
                    @if vm.state.current_block().is_some() {
                        p class="hint" { "Click an empty spot on the map to post a property there." }
                    }
                }

                (listing_section(vm))
            }
        },
    )
}

fn stats_bar(stats: &ListingStats) -> Markup {
    html! {
        section class="stats" {
            div class="stat" { span class="stat-value" id="total-properties" { (stats.total) } span { "Total" } }
            div class="stat" { span class="stat-value" id="rent-properties" { (stats.rent) } span { "For rent" } }
            div class="stat" { span class="stat-value" id="sell-properties" { (stats.sell) } span { "For sale" } }
            div class="stat" { span class="stat-value" id="farm-properties" { (stats.farm) } span { "Farms" } }
        }
    }
}

fn filters(vm: &DashboardVm) -> Markup {
    let current = vm.state.current_block();
    let kind = vm.state.type_filter();

    html! {
        form class="filters" method="get" action="/dashboard" {
            label for="block" { "Block" }
            select name="block" id="block" {
                option value="" selected[current.is_none()] { "Select a block..." }
                @for b in vm.blocks {
                    option value=(b) selected[current == Some(b.as_str())] { "Block " (b) }
                }
            }

            label for="type" { "Type" }
            select name="type" id="type" {
                option value="" selected[kind.is_none()] { "All types" }
                @for t in ListingType::ALL {
                    option value=(t.as_str()) selected[kind == Some(t)] { (t.as_str()) }
                }
            }

            input type="hidden" name="view" value=(vm.query.view.as_str());
            button type="submit" { "Apply" }
        }
    }
}

fn listing_section(vm: &DashboardVm) -> Markup {
    let heading = match vm.state.current_block() {
        Some(b) => format!("Properties in block {b}"),
        None => "Recent properties".to_string(),
    };
    let grid = vm.query.with_view(ViewMode::Grid).href("/dashboard");
    let list = vm.query.with_view(ViewMode::List).href("/dashboard");

    html! {
        section class="listings" {
            div class="listings-header" {
                h2 { (heading) }
                div class="view-toggle" {
                    a href=(grid) class=[(vm.query.view == ViewMode::Grid).then_some("active")] { "Grid" }
                    a href=(list) class=[(vm.query.view == ViewMode::List).then_some("active")] { "List" }
                }
            }
            @if vm.listings.is_empty() {
                p class="empty" { "No properties found." }
            } @else {
                div class=(format!("property-{}", vm.query.view.as_str())) id="properties-container" {
                    @for l in vm.listings {
                        (listing_card(l, vm.state.is_owner(l), vm.query))
                    }
                }
            }
        }
    }
}
