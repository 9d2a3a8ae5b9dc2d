use url::Url;

/// WhatsApp click-to-chat link with a prefilled greeting. Non-digits are
/// stripped from the phone number before the country code is prepended.
pub fn whatsapp_link(country_code: &str, phone: &str, name: &str, organization: &str) -> String {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    let message = format!(
        "Hi {}, I'm reaching out regarding your application with {}. Let's discuss the next steps!",
        name, organization
    );
    let base = format!("https://wa.me/{}{}", country_code, digits);
    match Url::parse_with_params(&base, &[("text", message.as_str())]) {
        Ok(url) => url.to_string(),
        Err(_) => base,
    }
}

pub fn call_link(phone: &str) -> String {
    format!("tel:{}", phone.trim())
}
