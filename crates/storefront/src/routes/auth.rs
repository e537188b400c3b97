//! Authentication route handlers.
//!
//! Sign-in, registration, and password reset against the commerce API's
//! auth endpoints. Validation failures redisplay via redirect with the
//! message in the query string; server rejections surface the server's
//! own message. Nothing is retried - a failed attempt is terminal until
//! the user resubmits.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use fresh_cart_core::{Email, PhoneNumber};

use crate::commerce::types::{SignInRequest, SignUpRequest};
use crate::filters;
use crate::middleware::Stores;
use crate::state::AppState;

use super::NavView;

/// Minimum password length, matching the API's own policy.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Minimum display-name length for registration.
const MIN_NAME_LENGTH: usize = 3;

// =============================================================================
// Form Types
// =============================================================================

/// Sign-in form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub re_password: String,
    pub phone: String,
}

/// Forgot password form data.
#[derive(Debug, Deserialize)]
pub struct ForgotPasswordForm {
    pub email: String,
}

/// Query parameters for error/success display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Sign-in page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub nav: NavView,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Registration page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub nav: NavView,
    pub error: Option<String>,
}

/// Forgot password page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/forgot_password.html")]
pub struct ForgotPasswordTemplate {
    pub nav: NavView,
    pub error: Option<String>,
    pub success: Option<String>,
}

// =============================================================================
// Validation
// =============================================================================

/// Check password strength: length, case mix, digit, special character.
fn validate_password(password: &str) -> std::result::Result<(), &'static str> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err("Password must be at least 8 characters long");
    }
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password.chars().any(|c| "@$!%*?&".contains(c));

    if has_lower && has_upper && has_digit && has_special {
        Ok(())
    } else {
        Err(
            "Password must include at least one uppercase letter, one lowercase letter, one digit, and one special character",
        )
    }
}

fn redirect_with_error(path: &str, message: &str) -> Response {
    Redirect::to(&format!("{path}?error={}", urlencoding::encode(message))).into_response()
}

// =============================================================================
// Sign-in Routes
// =============================================================================

/// Display the sign-in page.
pub async fn login_page(
    Stores(stores): Stores,
    Query(query): Query<MessageQuery>,
) -> LoginTemplate {
    LoginTemplate {
        nav: NavView::from_stores(&stores),
        error: query.error,
        success: query.success,
    }
}

/// Handle sign-in form submission.
///
/// On success the session store persists the token and derives the
/// identity; the browser lands back on the home page.
#[instrument(skip(stores, form))]
pub async fn login(Stores(stores): Stores, Form(form): Form<LoginForm>) -> Response {
    let email = match Email::parse(form.email.trim()) {
        Ok(email) => email,
        Err(e) => return redirect_with_error("/login", &e.to_string()),
    };

    let credentials = SignInRequest {
        email: email.to_string(),
        password: form.password,
    };

    match stores.session().sign_in(&credentials).await {
        Ok(identity) => {
            tracing::info!(user_id = %identity.user_id, "User signed in");
            Redirect::to("/").into_response()
        }
        Err(e) => {
            tracing::warn!("Sign in failed: {e}");
            redirect_with_error("/login", &e.user_message())
        }
    }
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page(
    Stores(stores): Stores,
    Query(query): Query<MessageQuery>,
) -> RegisterTemplate {
    RegisterTemplate {
        nav: NavView::from_stores(&stores),
        error: query.error,
    }
}

/// Handle registration form submission.
///
/// The API signs freshly registered users straight in, so on success the
/// browser lands on the home page with a live session.
#[instrument(skip(stores, form))]
pub async fn register(Stores(stores): Stores, Form(form): Form<RegisterForm>) -> Response {
    let name = form.name.trim();
    if name.len() < MIN_NAME_LENGTH {
        return redirect_with_error("/register", "Name must be at least 3 characters long");
    }

    let email = match Email::parse(form.email.trim()) {
        Ok(email) => email,
        Err(e) => return redirect_with_error("/register", &e.to_string()),
    };

    let phone = match PhoneNumber::parse(form.phone.trim()) {
        Ok(phone) => phone,
        Err(_) => {
            return redirect_with_error("/register", "Invalid Egyptian phone number format");
        }
    };

    if let Err(message) = validate_password(&form.password) {
        return redirect_with_error("/register", message);
    }

    if form.password != form.re_password {
        return redirect_with_error("/register", "Passwords do not match");
    }

    let registration = SignUpRequest {
        name: name.to_string(),
        email: email.to_string(),
        password: form.password.clone(),
        re_password: form.re_password,
        phone: phone.to_string(),
    };

    match stores.session().sign_up(&registration).await {
        Ok(identity) => {
            tracing::info!(user_id = %identity.user_id, "User registered");
            Redirect::to("/").into_response()
        }
        Err(e) => {
            tracing::warn!("Registration failed: {e}");
            redirect_with_error("/register", &e.user_message())
        }
    }
}

// =============================================================================
// Password Reset Routes
// =============================================================================

/// Display the forgot password page.
pub async fn forgot_password_page(
    Stores(stores): Stores,
    Query(query): Query<MessageQuery>,
) -> ForgotPasswordTemplate {
    ForgotPasswordTemplate {
        nav: NavView::from_stores(&stores),
        error: query.error,
        success: query.success,
    }
}

/// Handle forgot password form submission.
#[instrument(skip(state, form))]
pub async fn forgot_password(
    State(state): State<AppState>,
    Form(form): Form<ForgotPasswordForm>,
) -> Response {
    let email = match Email::parse(form.email.trim()) {
        Ok(email) => email,
        Err(e) => return redirect_with_error("/forgot-password", &e.to_string()),
    };

    match state.commerce().forgot_password(email.as_str()).await {
        Ok(_) => Redirect::to(&format!(
            "/forgot-password?success={}",
            urlencoding::encode("Reset code sent. Check your email.")
        ))
        .into_response(),
        Err(e) => {
            tracing::warn!("Password reset request failed: {e}");
            redirect_with_error("/forgot-password", &e.user_message())
        }
    }
}

// =============================================================================
// Sign-out Route
// =============================================================================

/// Handle sign-out.
///
/// Clears the persisted token and resets the cart snapshot. The wishlist
/// stays: it is client-local and survives sign-out, like the storage it
/// lives in.
#[instrument(skip(stores))]
pub async fn logout(Stores(stores): Stores) -> Redirect {
    stores.sign_out();
    Redirect::to("/login")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_password_accepts_strong() {
        assert!(validate_password("Secret@123").is_ok());
    }

    #[test]
    fn test_validate_password_rejects_short() {
        assert!(validate_password("S@1a").is_err());
    }

    #[test]
    fn test_validate_password_requires_character_classes() {
        assert!(validate_password("alllowercase@1").is_err()); // no uppercase
        assert!(validate_password("ALLUPPERCASE@1").is_err()); // no lowercase
        assert!(validate_password("NoDigits@abc").is_err()); // no digit
        assert!(validate_password("NoSpecial123a").is_err()); // no special
    }
}
