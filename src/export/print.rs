//! Formulario de matrícula imprimible (HTML)

use chrono::NaiveDate;

use crate::models::{ParentInfo, StudentRegistration};

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn date(value: Option<NaiveDate>) -> String {
    value.map(|d| d.format("%d/%m/%Y").to_string()).unwrap_or_default()
}

fn row(label: &str, value: &str) -> String {
    format!(
        "<tr><th>{}</th><td>{}</td></tr>\n",
        escape(label),
        escape(value)
    )
}

fn section(title: &str, rows: &[(&str, String)]) -> String {
    let mut html = format!("<h2>{}</h2>\n<table>\n", escape(title));
    for (label, value) in rows {
        html.push_str(&row(label, value));
    }
    html.push_str("</table>\n");
    html
}

fn parent_rows(parent: Option<&ParentInfo>) -> Vec<(&'static str, String)> {
    let parent = parent.cloned().unwrap_or_default();
    vec![
        ("Name", parent.name),
        ("Occupation", parent.occupation.unwrap_or_default()),
        ("Qualification", parent.qualification.unwrap_or_default()),
        ("Mobile", parent.mobile.unwrap_or_default()),
        ("Email", parent.email.unwrap_or_default()),
    ]
}

/// Documento HTML completo que se imprime al abrirse
pub fn print_registration_form(student: &StudentRegistration) -> String {
    let text = |v: &Option<String>| v.clone().unwrap_or_default();

    let mut body = String::new();
    body.push_str(&section(
        "Student Details",
        &[
            ("Form No", student.form_no.clone()),
            ("Full Name", student.full_name.clone()),
            ("Class", student.register_for_class.clone()),
            ("Registration Date", date(Some(student.regn_date))),
            ("Gender", text(&student.gender)),
            ("Date of Birth", date(student.date_of_birth)),
            ("Blood Group", text(&student.blood_group)),
            ("Religion", text(&student.religion)),
            ("Category", text(&student.category)),
            ("Nationality", text(&student.nationality)),
            ("Aadhaar No", text(&student.aadhaar_no)),
            ("Previous School", text(&student.previous_school)),
        ],
    ));
    body.push_str(&section("Father", &parent_rows(student.father.as_ref())));
    body.push_str(&section("Mother", &parent_rows(student.mother.as_ref())));
    body.push_str(&section(
        "Contact",
        &[
            ("Address", text(&student.address)),
            ("City", text(&student.city)),
            ("State", text(&student.state)),
            ("Pincode", text(&student.pincode)),
            ("Mobile", text(&student.mobile)),
            ("Email", text(&student.email)),
            ("Guardian", text(&student.guardian_name)),
            ("Guardian Mobile", text(&student.guardian_mobile)),
            (
                "Transport Required",
                if student.transport_required { "Yes" } else { "No" }.to_string(),
            ),
        ],
    ));

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Registration Form - {title}</title>
<style>
body {{ font-family: Arial, sans-serif; margin: 24px; }}
h1 {{ text-align: center; }}
table {{ width: 100%; border-collapse: collapse; margin-bottom: 16px; }}
th, td {{ border: 1px solid #ccc; padding: 6px; text-align: left; }}
th {{ width: 30%; background: #f5f5f5; }}
</style>
</head>
<body>
<h1>Student Registration Form</h1>
{body}<script>window.onload = function () {{ window.print(); }};</script>
</body>
</html>
"#,
        title = escape(&student.form_no),
        body = body,
    )
}
