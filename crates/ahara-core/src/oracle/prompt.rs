//! Prompt strings for the generator, in a fixed token order.

use std::fmt::Write;

use crate::records::Patient;

fn patient_fields(out: &mut String, patient: &Patient) {
    let _ = write!(
        out,
        "patient age {} gender {} bmi {:.1} lifestyle {} prakriti {} ",
        patient.age, patient.gender, patient.bmi, patient.lifestyle, patient.prakriti
    );
    if !patient.health_conditions.is_empty() {
        let _ = write!(out, "conditions {} ", patient.health_conditions.join(" "));
    }
    if !patient.allergies.is_empty() {
        let _ = write!(out, "allergies {} ", patient.allergies.join(" "));
    }
}

/// Prompt asking for a seven-day plan.
pub fn format_weekly_prompt(patient: &Patient) -> String {
    let mut out = String::from("generate weekly meal plan: ");
    patient_fields(&mut out, patient);
    out.push_str("generate 7 days");
    out
}

/// Prompt asking for a single day.
pub fn format_day_prompt(patient: &Patient, day: u8) -> String {
    let mut out = String::from("generate meal plan: ");
    patient_fields(&mut out, patient);
    let _ = write!(out, "day {day}");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekly_prompt_without_optional_sections() {
        let p = Patient::new("P1", 35, "male", 70.0, 175.0, "moderate", "vata");
        assert_eq!(
            format_weekly_prompt(&p),
            "generate weekly meal plan: patient age 35 gender male bmi 22.9 \
             lifestyle moderate prakriti vata generate 7 days"
        );
    }

    #[test]
    fn day_prompt_with_conditions_and_allergies() {
        let mut p = Patient::new("P2", 28, "female", 55.0, 160.0, "active", "pitta");
        p.health_conditions = vec!["acidity".into(), "skin issues".into()];
        p.allergies = vec!["nuts".into()];
        assert_eq!(
            format_day_prompt(&p, 3),
            "generate meal plan: patient age 28 gender female bmi 21.5 lifestyle active \
             prakriti pitta conditions acidity skin issues allergies nuts day 3"
        );
    }
}
