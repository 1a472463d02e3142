use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub static SURVEY: Lazy<Survey> = Lazy::new(|| {
    let f = std::fs::File::open("resources/stresformance.json").unwrap();
    let reader = std::io::BufReader::new(f);
    serde_json::from_reader(reader).unwrap()
});

/// Total number of questions across both measures.
pub const QUESTION_COUNT: usize = 11;

/// Fallback text shown when a category pair has no table entry.
pub const NO_RECOMMENDATION: &str = "no recommendation available";

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseOption {
    pub score: u8,
    pub label: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Question {
    pub id: u32,
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MeasureSection {
    pub measure: Measure,
    pub title: String,
    pub prompt: String,
    pub questions: Vec<Question>,
}

/// Master representation of the two-measure survey.
///
/// Questions are numbered 1..=11 across the whole survey: 1..=5 belong to the
/// stress measure, 6..=11 to the performance measure. The numbering is fixed
/// for display; scoring never depends on question order.
#[derive(Debug, Deserialize)]
pub struct Survey {
    pub measures: Vec<MeasureSection>,
    pub options: Vec<ResponseOption>,
}

impl Survey {
    /// Look up a question by its survey-wide number.
    pub fn question(&self, id: u32) -> Option<Question> {
        self.measures
            .iter()
            .flat_map(|section| section.questions.clone())
            .find(|question| question.id == id)
    }

    /// All questions in survey order.
    pub fn questions(&self) -> Vec<Question> {
        self.measures
            .iter()
            .flat_map(|section| section.questions.clone())
            .collect::<Vec<Question>>()
    }

    pub fn section(&self, measure: Measure) -> Option<&MeasureSection> {
        self.measures
            .iter()
            .find(|section| section.measure == measure)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Measure {
    Stress,
    Performance,
}

impl Measure {
    pub fn question_count(self) -> usize {
        match self {
            Measure::Stress => 5,
            Measure::Performance => 6,
        }
    }

    fn range(self) -> Range<usize> {
        match self {
            Measure::Stress => 0..5,
            Measure::Performance => 5..QUESTION_COUNT,
        }
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Measure::Stress => write!(f, "stress"),
            Measure::Performance => write!(f, "performance"),
        }
    }
}

/// One selection out of the fixed five-point frequency scale.
///
/// The scale asks how often something happened, so a higher score always means
/// more frequent. Decorated labels ("🔥 Very Frequent" and friends) are a
/// display concern; only the plain labels and the numeric scores 1..=5 parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    VeryRare,
    Rare,
    Moderate,
    Frequent,
    VeryFrequent,
}

impl Answer {
    pub fn from_score(score: u8) -> Result<Self, Error> {
        match score {
            1 => Ok(Answer::VeryRare),
            2 => Ok(Answer::Rare),
            3 => Ok(Answer::Moderate),
            4 => Ok(Answer::Frequent),
            5 => Ok(Answer::VeryFrequent),
            _ => Err(Error::InvalidAnswer(score.to_string())),
        }
    }

    pub fn score(self) -> u8 {
        match self {
            Answer::VeryRare => 1,
            Answer::Rare => 2,
            Answer::Moderate => 3,
            Answer::Frequent => 4,
            Answer::VeryFrequent => 5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Answer::VeryRare => "Very Rare",
            Answer::Rare => "Rare",
            Answer::Moderate => "Moderate",
            Answer::Frequent => "Frequent",
            Answer::VeryFrequent => "Very Frequent",
        }
    }
}

impl FromStr for Answer {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        if let Ok(score) = value.parse::<u8>() {
            return Answer::from_score(score);
        }
        match value.to_ascii_lowercase().as_str() {
            "very rare" => Ok(Answer::VeryRare),
            "rare" => Ok(Answer::Rare),
            "moderate" => Ok(Answer::Moderate),
            "frequent" => Ok(Answer::Frequent),
            "very frequent" => Ok(Answer::VeryFrequent),
            _ => Err(Error::InvalidAnswer(value.to_string())),
        }
    }
}

/// Collected answers for one respondent.
#[derive(Debug, Clone)]
pub struct AnswerSheet {
    values: [Option<Answer>; QUESTION_COUNT],
    offset: usize,
}

impl Default for AnswerSheet {
    fn default() -> Self {
        Self {
            values: [None; QUESTION_COUNT],
            offset: 0,
        }
    }
}

impl AnswerSheet {
    /// Record the answer to the next unanswered question in survey order.
    pub fn push(&mut self, answer: Answer) -> Result<(), Error> {
        if self.offset < QUESTION_COUNT {
            self.values[self.offset] = Some(answer);
            self.offset += 1;
            Ok(())
        } else {
            Err(Error::UnknownQuestion(self.offset as u8 + 1))
        }
    }

    /// Record the answer to a specific question, 1..=11. Overwrites any
    /// earlier answer to the same question.
    pub fn insert(&mut self, question_no: u8, answer: Answer) -> Result<(), Error> {
        if question_no < 1 || question_no as usize > QUESTION_COUNT {
            return Err(Error::UnknownQuestion(question_no));
        }
        self.values[(question_no - 1) as usize] = Some(answer);
        Ok(())
    }

    pub fn answer(&self, question_no: u8) -> Option<Answer> {
        if question_no < 1 || question_no as usize > QUESTION_COUNT {
            return None;
        }
        self.values[(question_no - 1) as usize]
    }

    /// Discard all answers, as the "Start New Assessment" action does.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_complete(&self, measure: Measure) -> bool {
        self.values[measure.range()].iter().all(Option::is_some)
    }

    /// Numeric scores for one measure, in question order.
    ///
    /// Every question of the measure must be answered; completeness is the
    /// caller's gate, and asking for scores early is an error rather than a
    /// partial result.
    pub fn scores(&self, measure: Measure) -> Result<Vec<u8>, Error> {
        self.values[measure.range()]
            .iter()
            .map(|slot| slot.map(Answer::score).ok_or(Error::IncompleteMeasure(measure)))
            .collect()
    }

    /// Run the full pipeline once both measures are complete: mean and
    /// category per measure, then the recommendation pair lookup.
    pub fn to_assessment(&self, thresholds: &Thresholds) -> Result<Assessment, Error> {
        let stress_mean = mean(&self.scores(Measure::Stress)?)?;
        let performance_mean = mean(&self.scores(Measure::Performance)?)?;
        let stress = MeasureReport {
            measure: Measure::Stress,
            mean: stress_mean,
            category: thresholds.classify_stress(stress_mean),
        };
        let performance = MeasureReport {
            measure: Measure::Performance,
            mean: performance_mean,
            category: thresholds.classify_performance(performance_mean),
        };
        let recommendation = recommendation(stress.category, performance.category);
        Ok(Assessment {
            stress,
            performance,
            recommendation,
        })
    }
}

/// Arithmetic mean of a score slice, unrounded.
///
/// An empty slice is an error: the advertised range is [1.0, 5.0], and a 0.0
/// stand-in would read as a valid "Very Low" result downstream.
pub fn mean(scores: &[u8]) -> Result<f64, Error> {
    if scores.is_empty() {
        return Err(Error::EmptyMeasure);
    }
    let sum = scores.iter().map(|&score| f64::from(score)).sum::<f64>();
    Ok(sum / scores.len() as f64)
}

/// Mean-score band boundaries, each the exclusive upper bound of its band.
///
/// Two tables are in circulation. [`Thresholds::CANONICAL`] puts the
/// low/moderate boundary at 2.0; [`Thresholds::WIDE_LOW`] stretches the low
/// band to 2.5. Both measures share one table, with the performance labels
/// read in the opposite direction (the performance questions count problems,
/// so a low mean is the good end).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub very_low: f64,
    pub low: f64,
    pub moderate: f64,
    pub high: f64,
}

impl Thresholds {
    pub const CANONICAL: Self = Self {
        very_low: 1.5,
        low: 2.0,
        moderate: 3.0,
        high: 4.0,
    };

    pub const WIDE_LOW: Self = Self {
        very_low: 1.5,
        low: 2.5,
        moderate: 3.0,
        high: 4.0,
    };

    fn band(&self, mean: f64) -> usize {
        if mean < self.very_low {
            0
        } else if mean < self.low {
            1
        } else if mean < self.moderate {
            2
        } else if mean < self.high {
            3
        } else {
            4
        }
    }

    pub fn classify_stress(&self, mean: f64) -> Category {
        [
            Category::VeryLow,
            Category::Low,
            Category::Moderate,
            Category::High,
            Category::VeryHigh,
        ][self.band(mean)]
    }

    pub fn classify_performance(&self, mean: f64) -> Category {
        [
            Category::VeryHigh,
            Category::High,
            Category::Moderate,
            Category::Low,
            Category::VeryLow,
        ][self.band(mean)]
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::CANONICAL
    }
}

/// Ordinal rating of one measure.
///
/// The label reads relative to its measure: Very High stress is the worst
/// stress outcome, Very High performance the best performance outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Category {
    #[serde(rename = "Very Low")]
    VeryLow,
    Low,
    Moderate,
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::VeryLow,
        Category::Low,
        Category::Moderate,
        Category::High,
        Category::VeryHigh,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::VeryLow => "Very Low",
            Category::Low => "Low",
            Category::Moderate => "Moderate",
            Category::High => "High",
            Category::VeryHigh => "Very High",
        }
    }

    /// One-line reading of the category for result screens.
    pub fn descriptor(self, measure: Measure) -> &'static str {
        match measure {
            Measure::Stress => match self {
                Category::VeryLow => "Excellent Resilience",
                Category::Low => "Good Balance",
                Category::Moderate => "Needs Attention",
                Category::High => "Significant Stress",
                Category::VeryHigh => "Critical Levels",
            },
            Measure::Performance => match self {
                Category::VeryLow => "Very Unproductive",
                Category::Low => "Needs Support",
                Category::Moderate => "Room for Improvement",
                Category::High => "Strong Output",
                Category::VeryHigh => "Peak Performance",
            },
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Advice for one (stress, performance) category pair, with an escalation
/// to the employer where the pair warrants one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub advice: &'static str,
    pub employer_action: Option<&'static str>,
}

const fn advise(advice: &'static str) -> Option<Recommendation> {
    Some(Recommendation {
        advice,
        employer_action: None,
    })
}

const fn escalate(advice: &'static str, action: &'static str) -> Option<Recommendation> {
    Some(Recommendation {
        advice,
        employer_action: Some(action),
    })
}

/// Fixed lookup from a (stress, performance) category pair to advice.
///
/// 18 of the 25 pairs carry an entry. The remaining 7 have no entry in any
/// known edition of the table and resolve to `None`; callers fall back to
/// [`NO_RECOMMENDATION`] for display.
pub fn recommendation(stress: Category, performance: Category) -> Option<Recommendation> {
    use Category::*;

    match (stress, performance) {
        (VeryLow, VeryLow) => escalate(
            "NEEDS TRAINING",
            "Schedule refresher training and set clear output goals",
        ),
        (VeryLow, Low) => escalate("NEEDS COACHING", "Assign a mentor and review task fit"),
        (VeryLow, Moderate) => advise("ENCOURAGE DEVELOPMENT"),
        (VeryLow, High) => advise("KEEP IT UP"),
        (VeryLow, VeryHigh) => advise("IDEAL STATE"),

        (Low, VeryLow) => escalate(
            "NEEDS TRAINING AND FOLLOW-UP",
            "Schedule training and re-assess within a month",
        ),
        (Low, Low) => escalate(
            "REVIEW WORK HABITS",
            "Discuss workload planning in the next one-on-one",
        ),
        (Low, Moderate) => advise("ROOM TO GROW"),
        (Low, High) => advise("ON TRACK"),
        (Low, VeryHigh) => advise("STRONG AND STEADY"),

        (Moderate, VeryLow) => escalate("INVESTIGATE OBSTACLES", "Hold a workload review meeting"),
        (Moderate, Low) => escalate("MONITOR CLOSELY", "Check in weekly until scores improve"),
        (Moderate, Moderate) => escalate("BALANCE WORKLOAD", "Review task distribution"),

        (High, High) => escalate("RISK OF BURNOUT", "Reduce assigned workload"),
        (High, VeryHigh) => escalate(
            "HIGH PERFORMER UNDER PRESSURE",
            "Reduce workload before output drops",
        ),

        (VeryHigh, VeryLow) => escalate(
            "URGENT INTERVENTION",
            "Refer to occupational health support",
        ),
        (VeryHigh, Low) => escalate(
            "REDUCE WORKLOAD NOW",
            "Reassign ongoing tasks and refer to counselling",
        ),
        (VeryHigh, Moderate) => escalate(
            "STRESS MANAGEMENT NEEDED",
            "Offer a stress management program",
        ),

        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MeasureReport {
    pub measure: Measure,
    pub mean: f64,
    pub category: Category,
}

impl MeasureReport {
    pub fn descriptor(&self) -> &'static str {
        self.category.descriptor(self.measure)
    }
}

/// Complete result of one survey run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Assessment {
    pub stress: MeasureReport,
    pub performance: MeasureReport,
    pub recommendation: Option<Recommendation>,
}

impl Assessment {
    pub fn advice_text(&self) -> &'static str {
        match self.recommendation {
            Some(recommendation) => recommendation.advice,
            None => NO_RECOMMENDATION,
        }
    }
}

/// Read completed surveys from CSV, one respondent per row: an id field
/// followed by 11 answer fields, each a score 1..=5 or a plain answer label.
pub fn read_bulk<R: std::io::Read>(
    reader: R,
) -> impl Iterator<Item = Result<(String, AnswerSheet), Error>> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_reader(reader)
        .into_records()
        .map(|record| parse_row(&record?))
}

fn parse_row(record: &csv::StringRecord) -> Result<(String, AnswerSheet), Error> {
    if record.len() != QUESTION_COUNT + 1 {
        return Err(Error::MalformedRow {
            expected: QUESTION_COUNT + 1,
            found: record.len(),
        });
    }
    let id = record[0].to_string();
    let mut sheet = AnswerSheet::default();
    for field in record.iter().skip(1) {
        sheet.push(field.parse()?)?;
    }
    Ok((id, sheet))
}

#[derive(Debug, Error)]
pub enum Error {
    /// Answer label or score outside the five-point vocabulary.
    #[error("unrecognized answer: {0:?}")]
    InvalidAnswer(String),
    /// Question number outside 1..=11.
    #[error("no such question: {0}")]
    UnknownQuestion(u8),
    /// A measure still has unanswered questions.
    #[error("{0} answers are incomplete")]
    IncompleteMeasure(Measure),
    /// Mean requested over no scores at all.
    #[error("cannot take the mean of an empty score list")]
    EmptyMeasure,
    /// CSV row with the wrong number of fields.
    #[error("expected {expected} fields per row, found {found}")]
    MalformedRow { expected: usize, found: usize },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
