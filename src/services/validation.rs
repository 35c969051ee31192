//! Form Validation
//!
//! Request bodies arrive as loosely typed forms (every field optional) so that
//! missing or malformed values can be reported per field instead of failing
//! the whole extractor. A form only turns into a write input once every field
//! has passed.
//!
//! Strings are trimmed and empty strings are treated as absent.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::db::{DonationInput, DonorInput, InquiryInput, InquiryUpdate};
use crate::types::{DonationStatus, InquiryStatus, MembershipCategory};

pub const MAX_NAME_LEN: usize = 255;
pub const MAX_PHONE_LEN: usize = 20;
pub const MAX_NOTES_LEN: usize = 500;
pub const MAX_PATH_LEN: usize = 255;

/// 최소 기부액 (Rp 1.000)
pub fn minimum_amount() -> Decimal {
    Decimal::from(1000)
}

/// NUMERIC(15,2) 상한 (정수부 13자리)
fn maximum_amount() -> Decimal {
    Decimal::from(10_000_000_000_000_i64)
}

/// 필드별 에러 메시지
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    /// 단일 필드 에러
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

// ============ Forms ============

/// POST /donation-inquiry
///
/// 모든 필드는 JSON 값 그대로 받아서, 타입이 틀려도 필드 에러로 보고한다.
#[derive(Debug, Default, Deserialize)]
pub struct InquiryForm {
    pub name: Option<Value>,
    pub whatsapp_number: Option<Value>,
}

/// POST /donors, PUT /donors/:id
#[derive(Debug, Default, Deserialize)]
pub struct DonorForm {
    pub full_name: Option<Value>,
    pub whatsapp_number: Option<Value>,
    pub membership_category: Option<Value>,
}

/// POST /donations, PUT /donations/:id
///
/// `donor_id`, `amount`는 숫자/문자열 모두 허용
#[derive(Debug, Default, Deserialize)]
pub struct DonationForm {
    pub donor_id: Option<Value>,
    pub amount: Option<Value>,
    pub notes: Option<Value>,
    pub status: Option<Value>,
    pub donation_date: Option<Value>,
    pub proof_of_payment_path: Option<Value>,
}

/// PUT /inquiries/:id
#[derive(Debug, Default, Deserialize)]
pub struct InquiryUpdateForm {
    pub status: Option<Value>,
    pub notes: Option<Value>,
    pub converted_donor_id: Option<Value>,
}

// ============ Validators ============

pub fn validate_inquiry(form: &InquiryForm) -> Result<InquiryInput, FieldErrors> {
    let mut errors = FieldErrors::new();
    let name = required_name(&mut errors, "name", &form.name);
    let whatsapp_number = whatsapp_number(&mut errors, &form.whatsapp_number);

    match (name, whatsapp_number) {
        (Some(name), Some(whatsapp_number)) if errors.is_empty() => Ok(InquiryInput {
            name,
            whatsapp_number,
        }),
        _ => Err(errors),
    }
}

pub fn validate_donor(form: &DonorForm) -> Result<DonorInput, FieldErrors> {
    let mut errors = FieldErrors::new();
    let full_name = required_name(&mut errors, "full_name", &form.full_name);
    let whatsapp_number = whatsapp_number(&mut errors, &form.whatsapp_number);

    let membership_category = match text(&form.membership_category) {
        Text::Missing => {
            errors.add("membership_category", "Kategori keanggotaan harus dipilih.");
            None
        }
        Text::Filled(raw) => match MembershipCategory::from_str(raw) {
            Ok(category) => Some(category),
            Err(_) => {
                errors.add("membership_category", "Kategori keanggotaan tidak valid.");
                None
            }
        },
        Text::WrongType => {
            errors.add("membership_category", "Kategori keanggotaan tidak valid.");
            None
        }
    };

    match (full_name, whatsapp_number, membership_category) {
        (Some(full_name), Some(whatsapp_number), Some(membership_category))
            if errors.is_empty() =>
        {
            Ok(DonorInput {
                full_name,
                whatsapp_number,
                membership_category,
            })
        }
        _ => Err(errors),
    }
}

/// 기부 폼 검증
///
/// 기부자 존재 여부는 저장 시점에 확인한다 (`DonationWrite::DonorMissing`).
pub fn validate_donation(form: &DonationForm) -> Result<DonationInput, FieldErrors> {
    let mut errors = FieldErrors::new();

    let donor_id = match form.donor_id.as_ref().filter(|v| !is_blank(v)) {
        None => {
            errors.add("donor_id", "Donatur harus dipilih.");
            None
        }
        Some(value) => match parse_id(value) {
            Some(id) => Some(id),
            None => {
                errors.add("donor_id", "Donatur tidak valid.");
                None
            }
        },
    };

    let amount = match form.amount.as_ref().filter(|v| !is_blank(v)) {
        None => {
            errors.add("amount", "Jumlah donasi harus diisi.");
            None
        }
        Some(value) => match parse_amount(value) {
            Ok(amount) => Some(amount),
            Err(err) => {
                errors.add("amount", err.message());
                None
            }
        },
    };

    let notes = optional_notes(&mut errors, &form.notes);

    let proof_of_payment_path = match text(&form.proof_of_payment_path) {
        Text::Missing => None,
        Text::Filled(path) if path.chars().count() <= MAX_PATH_LEN => Some(path.to_string()),
        Text::Filled(_) | Text::WrongType => {
            errors.add("proof_of_payment_path", "Bukti pembayaran tidak valid.");
            None
        }
    };

    let status = match text(&form.status) {
        Text::Missing => {
            errors.add("status", "Status donasi harus dipilih.");
            None
        }
        Text::Filled(raw) => match DonationStatus::from_str(raw) {
            Ok(status) => Some(status),
            Err(_) => {
                errors.add("status", "Status donasi tidak valid.");
                None
            }
        },
        Text::WrongType => {
            errors.add("status", "Status donasi tidak valid.");
            None
        }
    };

    let donation_date = match text(&form.donation_date) {
        Text::Missing => {
            errors.add("donation_date", "Tanggal donasi harus diisi.");
            None
        }
        Text::Filled(raw) => match parse_date(raw) {
            Some(date) => Some(date),
            None => {
                errors.add("donation_date", "Tanggal donasi tidak valid.");
                None
            }
        },
        Text::WrongType => {
            errors.add("donation_date", "Tanggal donasi tidak valid.");
            None
        }
    };

    match (donor_id, amount, status, donation_date) {
        (Some(donor_id), Some(amount), Some(status), Some(donation_date))
            if errors.is_empty() =>
        {
            Ok(DonationInput {
                donor_id,
                amount,
                notes,
                proof_of_payment_path,
                status,
                donation_date,
            })
        }
        _ => Err(errors),
    }
}

pub fn validate_inquiry_update(form: &InquiryUpdateForm) -> Result<InquiryUpdate, FieldErrors> {
    let mut errors = FieldErrors::new();

    let status = match text(&form.status) {
        Text::Missing => {
            errors.add("status", "Status tindak lanjut harus dipilih.");
            None
        }
        Text::Filled(raw) => match InquiryStatus::from_str(raw) {
            Ok(status) => Some(status),
            Err(_) => {
                errors.add("status", "Status tindak lanjut tidak valid.");
                None
            }
        },
        Text::WrongType => {
            errors.add("status", "Status tindak lanjut tidak valid.");
            None
        }
    };

    let notes = optional_notes(&mut errors, &form.notes);

    let converted_donor_id = match form.converted_donor_id.as_ref().filter(|v| !is_blank(v)) {
        None => None,
        Some(value) => {
            let id = parse_id(value);
            if id.is_none() {
                errors.add("converted_donor_id", "Donatur tidak valid.");
            }
            id
        }
    };

    match status {
        Some(status) if errors.is_empty() => Ok(InquiryUpdate {
            status,
            notes,
            converted_donor_id,
        }),
        _ => Err(errors),
    }
}

// ============ Helpers ============

/// 텍스트 필드 값
enum Text<'a> {
    /// 없음, null, 공백뿐인 문자열
    Missing,
    /// 앞뒤 공백 제거된 값
    Filled(&'a str),
    /// 문자열이 아닌 JSON 값
    WrongType,
}

fn text(value: &Option<Value>) -> Text<'_> {
    match value {
        None | Some(Value::Null) => Text::Missing,
        Some(Value::String(s)) => match s.trim() {
            "" => Text::Missing,
            trimmed => Text::Filled(trimmed),
        },
        Some(_) => Text::WrongType,
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn required_name(errors: &mut FieldErrors, field: &str, value: &Option<Value>) -> Option<String> {
    match text(value) {
        Text::Missing => {
            errors.add(field, "Nama lengkap harus diisi.");
            None
        }
        Text::WrongType => {
            errors.add(field, "Nama harus berupa teks.");
            None
        }
        Text::Filled(name) if name.chars().count() > MAX_NAME_LEN => {
            errors.add(field, "Nama tidak boleh lebih dari 255 karakter.");
            None
        }
        Text::Filled(name) => Some(name.to_string()),
    }
}

fn whatsapp_number(errors: &mut FieldErrors, value: &Option<Value>) -> Option<String> {
    const FIELD: &str = "whatsapp_number";
    let number = match text(value) {
        Text::Missing => {
            errors.add(FIELD, "Nomor WhatsApp harus diisi.");
            return None;
        }
        Text::WrongType => {
            errors.add(FIELD, "Nomor WhatsApp harus berupa teks.");
            return None;
        }
        Text::Filled(number) => number,
    };

    let mut valid = true;
    if number.chars().count() > MAX_PHONE_LEN {
        errors.add(FIELD, "Nomor WhatsApp tidak boleh lebih dari 20 karakter.");
        valid = false;
    }
    if !is_valid_phone_number(number) {
        errors.add(FIELD, "Format nomor WhatsApp tidak valid.");
        valid = false;
    }
    valid.then(|| number.to_string())
}

fn optional_notes(errors: &mut FieldErrors, value: &Option<Value>) -> Option<String> {
    match text(value) {
        Text::Missing => None,
        Text::WrongType => {
            errors.add("notes", "Catatan harus berupa teks.");
            None
        }
        Text::Filled(notes) if notes.chars().count() > MAX_NOTES_LEN => {
            errors.add("notes", "Catatan tidak boleh lebih dari 500 karakter.");
            None
        }
        Text::Filled(notes) => Some(notes.to_string()),
    }
}

/// 숫자, `+`, `-`, 공백, 괄호만 허용
pub fn is_valid_phone_number(number: &str) -> bool {
    !number.is_empty()
        && number
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')'))
}

fn parse_id(value: &Value) -> Option<i64> {
    let id = match value {
        Value::Number(n) => n.as_i64()?,
        Value::String(s) => s.trim().parse::<i64>().ok()?,
        _ => return None,
    };
    (id > 0).then_some(id)
}

/// 기부액 검증 실패 사유
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountError {
    NotANumber,
    BelowMinimum,
    TooLarge,
}

impl AmountError {
    pub fn message(self) -> &'static str {
        match self {
            AmountError::NotANumber => "Jumlah donasi harus berupa angka.",
            AmountError::BelowMinimum => "Jumlah donasi minimal Rp 1.000.",
            AmountError::TooLarge => "Jumlah donasi terlalu besar.",
        }
    }
}

/// 숫자 또는 숫자 문자열 → 소수 둘째 자리로 반올림한 Decimal
///
/// 최소액은 반올림 전 값으로, 상한은 저장될 값으로 판단한다.
pub fn parse_amount(value: &Value) -> Result<Decimal, AmountError> {
    let raw = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return Err(AmountError::NotANumber),
    };

    let amount = match Decimal::from_str(&raw).or_else(|_| Decimal::from_scientific(&raw)) {
        Ok(amount) => amount,
        // Decimal 범위를 넘는 숫자 (예: 1e30)
        Err(_) => {
            return match raw.parse::<f64>() {
                Ok(f) if f.is_finite() && f >= 1000.0 => Err(AmountError::TooLarge),
                Ok(f) if f.is_finite() => Err(AmountError::BelowMinimum),
                _ => Err(AmountError::NotANumber),
            };
        }
    };

    if amount < minimum_amount() {
        return Err(AmountError::BelowMinimum);
    }
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if rounded >= maximum_amount() {
        return Err(AmountError::TooLarge);
    }
    Ok(rounded)
}

/// `YYYY-MM-DD` 또는 RFC 3339 시각 (날짜 부분만 사용)
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}
