//! HTML rendering for the storefront pages

use axum::http::StatusCode;
use std::fmt::Write;
use storefront_auth::Role;
use storefront_core::{Catalog, FieldErrors, ProductDraft, SignupForm};
use url::form_urlencoded;

/// Escape text for HTML element content and quoted attributes
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{}</title>\n<link rel=\"stylesheet\" href=\"/static/style.css\">\n</head>\n\
         <body>\n{}\n</body>\n</html>\n",
        escape(title),
        body
    )
}

fn field_error(error: Option<&String>) -> String {
    error
        .map(|e| format!("<p class=\"field-error\">{}</p>", escape(e)))
        .unwrap_or_default()
}

fn form_message(message: Option<&str>) -> String {
    message
        .map(|m| format!("<p class=\"form-error\">{}</p>", escape(m)))
        .unwrap_or_default()
}

/// Login page
pub fn login_page(username: &str, errors: &FieldErrors, message: Option<&str>) -> String {
    let body = format!(
        "<form class=\"card\" method=\"post\" action=\"/login\">\n\
         <h1>Login</h1>\n\
         <label>Username *<input type=\"text\" name=\"username\" value=\"{username}\" aria-label=\"Username\"></label>\n\
         {username_error}\n\
         <label>Password *<input type=\"password\" name=\"password\" aria-label=\"Password\"></label>\n\
         {password_error}\n\
         <button type=\"submit\">Login</button>\n\
         {message}\n\
         <p><a href=\"/signup\">Sign Up</a></p>\n\
         </form>",
        username = escape(username),
        username_error = field_error(errors.username.as_ref()),
        password_error = field_error(errors.password.as_ref()),
        message = form_message(message),
    );
    layout("Login", &body)
}

/// Signup page
pub fn signup_page(form: &SignupForm, errors: &FieldErrors, message: Option<&str>) -> String {
    let checked = |role: Role| if form.role == role { " checked" } else { "" };

    let body = format!(
        "<form class=\"card\" method=\"post\" action=\"/signup\">\n\
         <h1>Sign Up</h1>\n\
         <label>First Name *<input type=\"text\" name=\"first_name\" value=\"{first_name}\"></label>\n\
         {first_name_error}\n\
         <label>Last Name<input type=\"text\" name=\"last_name\" value=\"{last_name}\"></label>\n\
         <label>Username *<input type=\"text\" name=\"username\" value=\"{username}\"></label>\n\
         {username_error}\n\
         <label>Password *<input type=\"password\" name=\"password\"></label>\n\
         {password_error}\n\
         <fieldset><legend>Role *</legend>\n\
         <label><input type=\"radio\" name=\"role\" value=\"user\"{user_checked}> User</label>\n\
         <label><input type=\"radio\" name=\"role\" value=\"admin\"{admin_checked}> Admin</label>\n\
         </fieldset>\n\
         <button type=\"submit\">Sign Up</button>\n\
         {message}\n\
         <p><a href=\"/login\">Already have an account? Login</a></p>\n\
         </form>",
        first_name = escape(&form.first_name),
        last_name = escape(&form.last_name),
        username = escape(&form.username),
        first_name_error = field_error(errors.first_name.as_ref()),
        username_error = field_error(errors.username.as_ref()),
        password_error = field_error(errors.password.as_ref()),
        user_checked = checked(Role::User),
        admin_checked = checked(Role::Admin),
        message = form_message(message),
    );
    layout("Sign Up", &body)
}

fn editor(draft: &ProductDraft) -> String {
    let (title, intent, submit) = if draft.is_new() {
        ("Add Product", "add", "Add Product")
    } else {
        ("Edit Product", "edit", "Save Changes")
    };

    format!(
        "<div class=\"modal\">\n<form class=\"card\" method=\"post\" action=\"/\">\n\
         <h1>{title}</h1>\n\
         <input type=\"hidden\" name=\"intent\" value=\"{intent}\">\n\
         <input type=\"hidden\" name=\"id\" value=\"{id}\">\n\
         <input type=\"text\" name=\"product_name\" placeholder=\"Product Name\" value=\"{name}\" required>\n\
         <input type=\"number\" step=\"any\" name=\"price\" placeholder=\"Price\" value=\"{price}\" required>\n\
         <input type=\"text\" name=\"category\" placeholder=\"Category\" value=\"{category}\" required>\n\
         <textarea name=\"detail\" placeholder=\"Description\">{detail}</textarea>\n\
         <button type=\"submit\">{submit}</button>\n\
         <a class=\"button secondary\" href=\"/\">Cancel</a>\n\
         </form>\n</div>",
        id = escape(draft.id.as_deref().unwrap_or("")),
        name = escape(&draft.product_name),
        price = escape(&draft.price),
        category = escape(&draft.category),
        detail = escape(&draft.detail),
    )
}

/// Catalog page
pub fn catalog_page(catalog: &Catalog, draft: Option<&ProductDraft>, notice: Option<&str>) -> String {
    let admin = catalog.can_edit();
    let filters = catalog.filters();

    let mut body = String::new();
    body.push_str(
        "<nav><a class=\"button danger\" href=\"/login\">Login With Different Account</a></nav>\n\
         <h1>Product List</h1>\n",
    );

    if admin {
        body.push_str("<p><a class=\"button\" href=\"/?add=1\">Add Product</a></p>\n");
    }

    if let Some(notice) = notice {
        let _ = writeln!(body, "<p class=\"form-error\">{}</p>", escape(notice));
    }

    let _ = writeln!(
        body,
        "<form class=\"filters\" method=\"get\" action=\"/\">\n\
         <input type=\"text\" name=\"name\" placeholder=\"Filter by Name\" value=\"{}\">\n\
         <input type=\"text\" name=\"category\" placeholder=\"Filter by Category\" value=\"{}\">\n\
         <input type=\"number\" step=\"any\" name=\"price\" placeholder=\"Max Price\" value=\"{}\">\n\
         <button type=\"submit\">Filter</button>\n\
         </form>",
        escape(&filters.name),
        escape(&filters.category),
        escape(&filters.price),
    );

    body.push_str(
        "<table>\n<thead><tr><th>Product Name</th><th>Price</th><th>Category</th><th>Description</th>",
    );
    if admin {
        body.push_str("<th>Actions</th>");
    }
    body.push_str("</tr></thead>\n<tbody>\n");

    for product in catalog.filtered() {
        let _ = write!(
            body,
            "<tr><td>{}</td><td>Rs. {}</td><td>{}</td><td>{}</td>",
            escape(&product.product_name),
            product.price,
            escape(&product.category),
            escape(&product.detail),
        );
        if admin {
            let id = escape(&product.id);
            let edit_query: String = form_urlencoded::byte_serialize(product.id.as_bytes()).collect();
            let _ = write!(
                body,
                "<td><a href=\"/?edit={edit_query}\">Edit</a>\
                 <form class=\"inline\" method=\"post\" action=\"/\">\
                 <input type=\"hidden\" name=\"intent\" value=\"delete\">\
                 <input type=\"hidden\" name=\"id\" value=\"{id}\">\
                 <button type=\"submit\" class=\"danger\">Delete</button></form></td>",
            );
        }
        body.push_str("</tr>\n");
    }
    body.push_str("</tbody>\n</table>\n");

    if let Some(draft) = draft {
        body.push_str(&editor(draft));
    }

    layout("Products", &body)
}

/// Error page
pub fn error_page(status: StatusCode, message: &str) -> String {
    let body = format!(
        "<div class=\"card\"><h1>{}</h1><p>{}</p><p><a href=\"/\">Back to products</a></p></div>",
        status.as_u16(),
        escape(message)
    );
    layout("Error", &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape("<a href=\"x\">Tom & Jerry's</a>"),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
    }

    #[test]
    fn test_login_page_shows_errors() {
        let errors = FieldErrors {
            username: Some("Username is required".to_string()),
            ..Default::default()
        };

        let html = login_page("<bob>", &errors, Some("Invalid username or password"));
        assert!(html.contains("Username is required"));
        assert!(html.contains("Invalid username or password"));
        assert!(html.contains("value=\"&lt;bob&gt;\""));
    }

    #[test]
    fn test_signup_page_checks_role() {
        let form = SignupForm {
            role: Role::Admin,
            ..Default::default()
        };

        let html = signup_page(&form, &FieldErrors::default(), None);
        assert!(html.contains("value=\"admin\" checked"));
        assert!(!html.contains("value=\"user\" checked"));
    }
}
