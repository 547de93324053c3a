//! Capture encoding: rasterize the ready page to PDF or PNG bytes

use crate::browser::BrowserSession;
use headless_chrome::protocol::cdp::Page::CaptureScreenshotFormatOption;
use headless_chrome::types::PrintToPdfOptions;
use reportcap_core::{ReportError, ReportFormat, Result};
use tracing::{debug, info};

/// Fixed print width in CSS pixels
const PDF_PAGE_WIDTH_PX: f64 = 1680.0;

/// CDP print geometry is specified in inches
const CSS_PIXELS_PER_INCH: f64 = 96.0;

/// Print geometry for a document of the given scroll height
///
/// The whole document is printed as exactly one tall page: height tracks the
/// scroll height, width is fixed, and the page range is pinned to the first
/// page so Chromium never paginates.
pub fn pdf_options_for_height(scroll_height_px: f64) -> PrintToPdfOptions {
    PrintToPdfOptions {
        print_background: Some(true),
        paper_width: Some(PDF_PAGE_WIDTH_PX / CSS_PIXELS_PER_INCH),
        paper_height: Some(scroll_height_px / CSS_PIXELS_PER_INCH),
        page_ranges: Some("1".to_string()),
        ..Default::default()
    }
}

/// Convert the ready page into an output artifact byte stream
///
/// No retry: a failure here is terminal for the whole capture.
pub async fn encode(session: &BrowserSession, format: ReportFormat) -> Result<Vec<u8>> {
    let bytes = match format {
        ReportFormat::Pdf => {
            let scroll_height = session.scroll_height().await?;
            debug!("Printing PDF at document height {}px", scroll_height);

            session
                .tab()
                .print_to_pdf(Some(pdf_options_for_height(scroll_height)))
                .map_err(|e| ReportError::Encoding(format!("PDF generation failed: {}", e)))?
        }
        ReportFormat::Png => {
            debug!("Capturing full-page screenshot");

            session
                .tab()
                .capture_screenshot(CaptureScreenshotFormatOption::Png, None, None, true)
                .map_err(|e| ReportError::Encoding(format!("Screenshot capture failed: {}", e)))?
        }
    };

    info!("Encoded {} report ({} bytes)", format, bytes.len());
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_height_tracks_scroll_height() {
        let options = pdf_options_for_height(2400.0);
        // 2400px at 96px/in
        assert_eq!(options.paper_height, Some(25.0));
        assert_eq!(options.paper_width, Some(17.5));
    }

    #[test]
    fn test_pdf_prints_one_page_with_background() {
        let options = pdf_options_for_height(900.0);
        assert_eq!(options.page_ranges.as_deref(), Some("1"));
        assert_eq!(options.print_background, Some(true));
        assert!(options.margin_top.is_none());
        assert!(options.margin_bottom.is_none());
    }
}
