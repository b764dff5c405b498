use crate::domain::models::booking::Booking;
use crate::error::AppError;
use tera::{Context, Tera};

fn render(templates: &Tera, template: &str, booking: &Booking, reason: Option<&str>) -> Result<String, AppError> {
    let mut ctx = Context::new();
    ctx.insert("booking", booking);
    if let Some(reason) = reason {
        ctx.insert("reason", reason);
    }
    templates.render(template, &ctx).map_err(|e| {
        AppError::InternalWithMsg(format!("Template rendering failed ({}): {}", template, e))
    })
}

/// Owner notification for a freshly submitted request.
pub fn new_request_email(templates: &Tera, booking: &Booking) -> Result<(String, String), AppError> {
    let html = render(templates, "new_request.html", booking, None)?;
    Ok((format!("New Booking Request - {}", booking.name), html))
}

/// Customer mail sent when an admin confirms the booking.
pub fn confirmation_email(templates: &Tera, booking: &Booking) -> Result<(String, String), AppError> {
    let html = render(templates, "confirmation.html", booking, None)?;
    Ok((
        format!("Booking Confirmed: {} to {}", booking.from_date, booking.to_date),
        html,
    ))
}

/// Customer mail sent when an admin rejects the booking, including the reason.
pub fn rejection_email(templates: &Tera, booking: &Booking, reason: &str) -> Result<(String, String), AppError> {
    let html = render(templates, "rejection.html", booking, Some(reason))?;
    Ok(("Update on Your Booking Request".to_string(), html))
}
