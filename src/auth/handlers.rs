use axum::{
    extract::{FromRef, State},
    http::{header, StatusCode},
    response::AppendHeaders,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{
            AuthResponse, ChangePasswordRequest, ForgotPasswordRequest, LoginRequest,
            MessageResponse, RegisterRequest, ResetPasswordRequest, UserResponse,
            VerifyEmailRequest, VerifyOtpRequest,
        },
        jwt::{expired_session_cookie, session_cookie, AuthUser, JwtKeys},
        otp::generate_otp,
        password::{hash_password, verify_password},
        repo::TempUser,
    },
    error::ApiError,
    extract::Json,
    state::AppState,
    users::repo::{NewUser, User},
};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn otp_email_html(otp: &str) -> String {
    format!(
        r#"<div style="font-family:Arial,sans-serif;max-width:480px;margin:auto;padding:32px;border:1px solid #e5e7eb;border-radius:12px;">
  <h2 style="color:#2563eb;margin-bottom:8px;">Fundify &mdash; Email Verification</h2>
  <p style="color:#374151;margin-bottom:24px;">Use the OTP below to verify your email. It expires in <strong>10 minutes</strong>.</p>
  <div style="font-size:36px;font-weight:bold;letter-spacing:10px;text-align:center;color:#1e40af;background:#eff6ff;padding:20px;border-radius:8px;">{otp}</div>
  <p style="color:#6b7280;font-size:12px;margin-top:24px;">If you did not request this, please ignore this email.</p>
</div>"#
    )
}

type SetCookie = AppendHeaders<[(header::HeaderName, String); 1]>;

/// Signs a session JWT and pairs the response with its Set-Cookie header.
fn send_token(
    state: &AppState,
    user: User,
    status: StatusCode,
) -> Result<(StatusCode, SetCookie, Json<AuthResponse>), ApiError> {
    let keys = JwtKeys::from_ref(state);
    let token = keys.sign(user.id).map_err(ApiError::Internal)?;
    let cookie = session_cookie(&token, keys.ttl.as_secs());
    Ok((
        status,
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Json(AuthResponse {
            success: true,
            token,
            user,
        }),
    ))
}

/// Generates and emails an OTP for the address, upserting the temp record.
/// On delivery failure the pending record is removed again.
async fn send_otp_email(state: &AppState, email: &str) -> Result<(), ApiError> {
    let (otp, otp_expire) = generate_otp(6);
    TempUser::upsert(&state.db, email, &otp, otp_expire).await?;

    let text = format!("Your Fundify OTP is: {otp}. It expires in 10 minutes.");
    if let Err(e) = state
        .mailer
        .send(
            email,
            "Fundify — Verify Your Email",
            &text,
            Some(&otp_email_html(&otp)),
        )
        .await
    {
        warn!(error = %e, %email, "OTP email delivery failed");
        TempUser::delete_by_email(&state.db, email).await?;
        return Err(ApiError::Server(
            "Failed to send OTP. Please try again.".into(),
        ));
    }
    Ok(())
}

/// Shared OTP check for pre-registration and forgot-password flows.
async fn check_otp(state: &AppState, payload: VerifyOtpRequest) -> Result<String, ApiError> {
    let (email, otp) = match (payload.email, payload.otp) {
        (Some(e), Some(o)) if !e.is_empty() && !o.is_empty() => (e, o),
        _ => return Err(ApiError::BadRequest("Email and OTP are required".into())),
    };

    let temp = TempUser::find_active_by_email(&state.db, &email)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound("No verification request found. Please request a new OTP.".into())
        })?;

    if temp.otp_expire < time::OffsetDateTime::now_utc() {
        TempUser::delete_by_email(&state.db, &email).await?;
        return Err(ApiError::BadRequest(
            "OTP has expired. Please request a new one.".into(),
        ));
    }

    if temp.otp_code != otp {
        return Err(ApiError::BadRequest("Invalid OTP. Please try again.".into()));
    }

    TempUser::mark_verified(&state.db, &email).await?;
    Ok(email)
}

// ─── Pre-registration email verification ───

#[instrument(skip(state, payload))]
pub async fn verify_email(
    State(state): State<AppState>,
    Json(payload): Json<VerifyEmailRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let email = payload
        .email
        .filter(|e| !e.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Email is required".into()))?;

    if !is_valid_email(&email) {
        return Err(ApiError::BadRequest("Invalid email".into()));
    }

    if User::find_by_email(&state.db, &email).await?.is_some() {
        return Err(ApiError::Conflict(
            "An account with this email already exists".into(),
        ));
    }

    send_otp_email(&state, &email).await?;

    Ok(Json(MessageResponse::new(format!(
        "OTP sent to {email}. Please check your inbox."
    ))))
}

#[instrument(skip(state, payload))]
pub async fn verify_otp(
    State(state): State<AppState>,
    Json(payload): Json<VerifyOtpRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    check_otp(&state, payload).await?;
    Ok(Json(MessageResponse::new(
        "Email verified successfully. You may now complete registration.",
    )))
}

// ─── Registration and session ───

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, SetCookie, Json<AuthResponse>), ApiError> {
    let RegisterRequest {
        name: Some(name),
        email: Some(email),
        password: Some(password),
        phone: Some(phone),
        age: Some(age),
        gender: Some(gender),
        address: Some(address),
        city: Some(city),
        state: Some(st),
        zip: Some(zip),
        country: Some(country),
        marital_status: Some(marital_status),
        dependents: Some(dependents),
        employment_type: Some(employment_type),
        annual_income: Some(annual_income),
        risk_profile: Some(risk_profile),
    } = payload
    else {
        return Err(ApiError::BadRequest("All fields are required".into()));
    };

    // Email must have gone through the OTP flow first.
    let verified = TempUser::find_active_by_email(&state.db, &email)
        .await?
        .map(|t| t.is_verified)
        .unwrap_or(false);
    if !verified {
        return Err(ApiError::Forbidden(
            "Email not verified. Please verify your email before registering.".into(),
        ));
    }

    let password_hash = hash_password(&password)?;
    let user = User::create(
        &state.db,
        &NewUser {
            name,
            email: email.clone(),
            password_hash,
            phone,
            age,
            gender,
            address,
            city,
            state: st,
            zip,
            country,
            marital_status,
            dependents,
            employment_type,
            annual_income,
            risk_profile,
        },
    )
    .await?;

    TempUser::delete_by_email(&state.db, &email).await?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    send_token(&state, user, StatusCode::CREATED)
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<(StatusCode, SetCookie, Json<AuthResponse>), ApiError> {
    let (email, password) = match (payload.email, payload.password) {
        (Some(e), Some(p)) if !e.is_empty() && !p.is_empty() => (e, p),
        _ => return Err(ApiError::BadRequest("All fields are required".into())),
    };

    // Identical message for unknown email and wrong password so the
    // response never reveals which factor failed.
    let invalid = || ApiError::Unauthorized("Invalid email or password".into());

    let user = User::find_by_email(&state.db, &email)
        .await?
        .ok_or_else(invalid)?;

    if !verify_password(&password, &user.password_hash)? {
        warn!(user_id = %user.id, "login with invalid password");
        return Err(invalid());
    }

    info!(user_id = %user.id, "user logged in");
    send_token(&state, user, StatusCode::OK)
}

#[instrument]
pub async fn logout() -> (SetCookie, Json<MessageResponse>) {
    (
        AppendHeaders([(header::SET_COOKIE, expired_session_cookie())]),
        Json(MessageResponse::new("User logged out successfully")),
    )
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<UserResponse>, ApiError> {
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;
    Ok(Json(UserResponse {
        success: true,
        user,
    }))
}

// ─── Password recovery ───

#[instrument(skip(state, payload))]
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(payload): Json<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let email = payload
        .email
        .filter(|e| !e.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Email is required".into()))?;

    User::find_by_email(&state.db, &email)
        .await?
        .ok_or_else(|| ApiError::NotFound("No account found with this email".into()))?;

    send_otp_email(&state, &email).await?;

    Ok(Json(MessageResponse::new(format!(
        "OTP sent to {email}. Please check your inbox."
    ))))
}

#[instrument(skip(state, payload))]
pub async fn forgot_password_verify_otp(
    State(state): State<AppState>,
    Json(payload): Json<VerifyOtpRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    check_otp(&state, payload).await?;
    Ok(Json(MessageResponse::new(
        "OTP verified. You may now reset your password.",
    )))
}

#[instrument(skip(state, payload))]
pub async fn reset_password(
    State(state): State<AppState>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let (email, password) = match (payload.email, payload.password) {
        (Some(e), Some(p)) if !e.is_empty() && !p.is_empty() => (e, p),
        _ => {
            return Err(ApiError::BadRequest(
                "Email and new password are required".into(),
            ))
        }
    };

    let verified = TempUser::find_active_by_email(&state.db, &email)
        .await?
        .map(|t| t.is_verified)
        .unwrap_or(false);
    if !verified {
        return Err(ApiError::Forbidden(
            "OTP not verified. Please verify the OTP before resetting your password.".into(),
        ));
    }

    let user = User::find_by_email(&state.db, &email)
        .await?
        .ok_or_else(|| ApiError::NotFound("No account found with this email".into()))?;

    let hash = hash_password(&password)?;
    User::set_password_hash(&state.db, user.id, &hash).await?;
    TempUser::delete_by_email(&state.db, &email).await?;

    info!(user_id = %user.id, "password reset");
    Ok(Json(MessageResponse::new(
        "Password reset successfully. Please login with your new password.",
    )))
}

#[instrument(skip(state, payload))]
pub async fn change_password(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let (old_password, new_password) = match (payload.old_password, payload.new_password) {
        (Some(o), Some(n)) if !o.is_empty() && !n.is_empty() => (o, n),
        _ => {
            return Err(ApiError::BadRequest(
                "Old and new passwords are required".into(),
            ))
        }
    };

    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    if !verify_password(&old_password, &user.password_hash)? {
        return Err(ApiError::Unauthorized("Old password is incorrect".into()));
    }

    let hash = hash_password(&new_password)?;
    User::set_password_hash(&state.db, user.id, &hash).await?;

    Ok(Json(MessageResponse::new("Password changed successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("a.b+c@sub.domain.in"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("missing@tld"));
        assert!(!is_valid_email("spaces in@mail.com"));
    }

    #[test]
    fn otp_email_contains_the_code() {
        let html = otp_email_html("123456");
        assert!(html.contains("123456"));
        assert!(html.contains("10 minutes"));
    }

    #[test]
    fn register_payload_with_missing_field_fails_validation() {
        // zip omitted on purpose
        let json = serde_json::json!({
            "name": "Asha", "email": "asha@example.com", "password": "secret123",
            "phone": "9999999999", "age": 31, "gender": "female",
            "address": "12 MG Road", "city": "Pune", "state": "MH",
            "country": "India", "maritalStatus": "single", "dependents": 0,
            "employmentType": "salaried", "annualIncome": 1200000.0,
            "riskProfile": "moderate"
        });
        let parsed: RegisterRequest = serde_json::from_value(json).unwrap();
        assert!(parsed.zip.is_none());
        assert_eq!(parsed.marital_status.as_deref(), Some("single"));
    }
}
