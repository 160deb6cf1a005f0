#![allow(missing_docs)]

pub(crate) mod form;
pub(crate) mod html;
pub(crate) mod http;
pub(crate) mod store;

pub(crate) use form::{
    assert_form_input, assert_form_input_with_value, assert_form_select_with_value,
    assert_form_submit_button_with_text, assert_hx_endpoint, assert_required_form_input,
    must_get_form,
};
pub(crate) use html::{assert_valid_html, parse_html_document, parse_html_fragment};
pub(crate) use http::{assert_content_type, assert_hx_redirect};
pub(crate) use store::{must_add_entry, must_create_test_store};
