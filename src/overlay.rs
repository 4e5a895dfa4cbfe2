use web_sys as web;

#[inline]
pub fn show(document: &web::Document) {
    if let Some(el) = document.get_element_by_id("start-overlay") {
        let cl = el.class_list();
        _ = cl.remove_1("hidden");
        // fallback for environments without CSS class
        _ = el.set_attribute("style", "");
    }
}

#[inline]
pub fn hide(document: &web::Document) {
    if let Some(el) = document.get_element_by_id("start-overlay") {
        let cl = el.class_list();
        _ = cl.add_1("hidden");
        // fallback
        _ = el.set_attribute("style", "display:none");
    }
}

#[inline]
pub fn is_hidden(document: &web::Document) -> bool {
    if let Some(el) = document.get_element_by_id("start-overlay") {
        if el.class_list().contains("hidden") {
            return true;
        }
        return el
            .get_attribute("style")
            .map(|s| s.contains("display:none"))
            .unwrap_or(false);
    }
    false
}

#[inline]
pub fn toggle(document: &web::Document) {
    if is_hidden(document) {
        show(document);
    } else {
        hide(document);
    }
}

/// One-line status under the canvas (mic state, errors, tuning changes).
pub fn set_status(document: &web::Document, text: &str) {
    if let Some(el) = document.get_element_by_id("status") {
        el.set_text_content(Some(text));
    }
}

pub fn show_tuning(document: &web::Document, sensitivity: f32, threshold: f32, wind: f32) {
    set_status(
        document,
        &format!(
            "Sensitivity: {:.2} • Threshold: {:.2} • Wind: {:.2}",
            sensitivity, threshold, wind
        ),
    );
}

/// Width of the breath meter bar follows the envelope.
pub fn set_meter(document: &web::Document, level: f32) {
    if let Some(el) = document.get_element_by_id("breath-meter") {
        let pct = (level.clamp(0.0, 1.0) * 100.0).round();
        _ = el.set_attribute("style", &format!("width:{}%", pct));
    }
}
