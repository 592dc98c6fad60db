use crate::domain::model::{Question, SurveyResponse};
use crate::utils::error::{Result, SurveyError};
use csv::{QuoteStyle, Terminator, WriterBuilder};

pub const CSV_HEADERS: [&str; 13] = [
    "Timestamp",
    "Language",
    "Visit Types",
    "How Found",
    "Future Activities",
    "Observations",
    "Info Activity Rating",
    "Exhibition Interest Rating",
    "Info Adequate Rating",
    "Staff Attention Rating",
    "Accessibility Rating",
    "Cleanliness Rating",
    "Overall Satisfaction Rating",
];

/// CSV of backed-up responses: bare header, quoted text, bare ratings with
/// `0` for unanswered questions.
pub fn export_csv(responses: &[SurveyResponse]) -> Result<String> {
    let mut buffer = Vec::new();

    {
        let mut header = WriterBuilder::new()
            .quote_style(QuoteStyle::Necessary)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(&mut buffer);
        header.write_record(CSV_HEADERS)?;
        header.flush()?;
    }

    for response in responses {
        write_row(&mut buffer, response)?;
    }

    String::from_utf8(buffer)
        .map_err(|e| SurveyError::IoError(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

/// Text cells go through an always-quoting writer that ends on the field
/// separator, ratings through a plain one that ends the line.
fn write_row(buffer: &mut Vec<u8>, response: &SurveyResponse) -> Result<()> {
    {
        let mut text = WriterBuilder::new()
            .quote_style(QuoteStyle::Always)
            .terminator(Terminator::Any(b','))
            .from_writer(&mut *buffer);
        text.write_record(text_cells(response))?;
        text.flush()?;
    }

    let mut ratings = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(&mut *buffer);
    ratings.write_record(rating_cells(response))?;
    ratings.flush()?;
    Ok(())
}

fn text_cells(response: &SurveyResponse) -> [String; 6] {
    [
        response.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
        response.language.code().to_string(),
        response.visit_types.join(", "),
        response.how_found.join(", "),
        response.future_activities.clone(),
        response.observations.clone(),
    ]
}

fn rating_cells(response: &SurveyResponse) -> Vec<String> {
    Question::ALL
        .into_iter()
        .map(|q| {
            response
                .ratings
                .get(q)
                .map(|r| r.value())
                .unwrap_or(0)
                .to_string()
        })
        .collect()
}

/// File name the form used for full exports, e.g.
/// `museum-survey-all-data-2025-03-01.csv`.
pub fn export_file_name(date: chrono::NaiveDate) -> String {
    format!("museum-survey-all-data-{}.csv", date.format("%Y-%m-%d"))
}
