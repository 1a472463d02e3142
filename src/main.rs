use std::io::stdin;

use stresformance::{AnswerSheet, Error, Thresholds, NO_RECOMMENDATION, SURVEY};

fn main() {
    let mut buffer = String::new();
    let mut sheet = AnswerSheet::default();

    for section in &SURVEY.measures {
        println!("== {} ==", section.title);
        println!("{}", section.prompt);
        println!();
        for question in &section.questions {
            println!("{}. {}", question.id, question.text);
            for option in &SURVEY.options {
                print!("  {} => {}", option.score, option.label);
            }
            loop {
                println!();
                stdin().read_line(&mut buffer).unwrap();
                if store_answer(buffer.trim(), &mut sheet).is_err() {
                    println!("Answer with 1-5 or one of the listed labels.");
                    buffer.clear();
                } else {
                    buffer.clear();
                    break;
                }
            }
            println!();
        }
    }

    let assessment = sheet.to_assessment(&Thresholds::default()).unwrap();
    println!(
        "Stress: {:.2}/5.00, {} ({})",
        assessment.stress.mean,
        assessment.stress.category,
        assessment.stress.descriptor()
    );
    println!(
        "Performance: {:.2}/5.00, {} ({})",
        assessment.performance.mean,
        assessment.performance.category,
        assessment.performance.descriptor()
    );
    match assessment.recommendation {
        Some(recommendation) => {
            println!("Recommendation: {}", recommendation.advice);
            if let Some(action) = recommendation.employer_action {
                println!("Suggested employer action: {}", action);
            }
        }
        None => println!("Recommendation: {}", NO_RECOMMENDATION),
    }
}

fn store_answer(value: &str, sheet: &mut AnswerSheet) -> Result<(), Error> {
    sheet.push(value.parse()?)
}
