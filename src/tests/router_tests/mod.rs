mod api_auth_tests;
mod api_property_tests;
mod page_tests;
mod static_tests;
