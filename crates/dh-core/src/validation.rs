//! Local form validation.
//!
//! Every rule here runs before anything is sent to the server. A failure
//! names the offending field and carries a user-facing message.

use chrono::NaiveDate;
use thiserror::Error;

use crate::flow::{
    DocumentImage, InsuranceForm, LicenseForm, RegistrationForm, SignupForm, VehicleDetailsForm,
};

/// Upload size cap for document images.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Accepted image content types for document uploads.
pub const ALLOWED_IMAGE_TYPES: &[&str] = &[
    "image/png",
    "image/jpg",
    "image/jpeg",
    "image/avif",
    "image/gif",
    "image/bmp",
    "image/tiff",
    "image/webp",
    "image/svg+xml",
    "image/heif",
    "image/heic",
];

/// A single field failed a local rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new(field, "This field is required"))
    } else {
        Ok(())
    }
}

/// Keep only the digits of a phone number.
pub fn normalize_phone(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Phone numbers are ten digits after normalization.
pub fn validate_phone(raw: &str) -> Result<String, ValidationError> {
    let digits = normalize_phone(raw);
    if digits.len() != 10 {
        return Err(ValidationError::new(
            "phone",
            "Phone number must be 10 digits",
        ));
    }
    Ok(digits)
}

/// One-time codes are exactly six digits.
pub fn validate_otp(otp: &str) -> Result<(), ValidationError> {
    if otp.len() != 6 || !otp.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::new("otp", "Enter the 6-digit code"));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    require("email", email)?;
    let trimmed = email.trim();
    let valid = match trimmed.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        None => false,
    };
    if !valid {
        return Err(ValidationError::new("email", "Enter a valid email address"));
    }
    Ok(())
}

pub fn validate_image(field: &'static str, image: &DocumentImage) -> Result<(), ValidationError> {
    if image.bytes.is_empty() {
        return Err(ValidationError::new(field, "This field is required"));
    }
    if image.bytes.len() > MAX_IMAGE_BYTES {
        return Err(ValidationError::new(field, "File size must be less than 5MB"));
    }
    if !ALLOWED_IMAGE_TYPES.contains(&image.content_type.as_str()) {
        return Err(ValidationError::new(field, "Unsupported image format"));
    }
    Ok(())
}

/// Expiry dates must not be in the past relative to `today`.
pub fn validate_expiry_date(
    field: &'static str,
    date: NaiveDate,
    today: NaiveDate,
) -> Result<(), ValidationError> {
    if date < today {
        return Err(ValidationError::new(
            field,
            "Expiry date must be in the future",
        ));
    }
    Ok(())
}

pub fn validate_signup(form: &SignupForm) -> Result<(), ValidationError> {
    require("name", &form.name)?;
    validate_email(&form.email)?;
    validate_phone(&form.phone)?;
    if let Some(photo) = &form.photo {
        validate_image("photo", photo)?;
    }
    Ok(())
}

pub fn validate_license(form: &LicenseForm, today: NaiveDate) -> Result<(), ValidationError> {
    require("licenseNumber", &form.license_number)?;
    if form.license_number.trim().len() < 3 {
        return Err(ValidationError::new(
            "licenseNumber",
            "License number must be at least 3 characters",
        ));
    }
    validate_expiry_date("expiryDate", form.expiry_date, today)?;
    validate_image("licenseFront", &form.front)?;
    validate_image("licenseBack", &form.back)?;
    Ok(())
}

pub fn validate_registration(form: &RegistrationForm) -> Result<(), ValidationError> {
    validate_image("registrationFront", &form.front)?;
    validate_image("registrationBack", &form.back)?;
    Ok(())
}

pub fn validate_insurance(form: &InsuranceForm) -> Result<(), ValidationError> {
    validate_image("insuranceCertificate", &form.certificate)?;
    Ok(())
}

pub fn validate_vehicle_details(
    form: &VehicleDetailsForm,
    today: NaiveDate,
) -> Result<(), ValidationError> {
    require("make", &form.make)?;
    require("model", &form.model)?;
    require("yearOfManufacture", &form.year_of_manufacture)?;
    require("color", &form.color)?;
    require(
        "vehicleIdentificationNumber",
        &form.vehicle_identification_number,
    )?;
    require("licensePlateNumber", &form.license_plate_number)?;
    require("registrationNumber", &form.registration_number)?;
    require("regionOfRegistration", &form.region_of_registration)?;
    require("vehicleType", &form.vehicle_type)?;
    if let Some(expiry) = form.expiry_date {
        validate_expiry_date("expiryDate", expiry, today)?;
    }
    Ok(())
}
