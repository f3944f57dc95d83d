//! HTML pages. Each view takes a context and returns markup; all
//! interpolated values are escaped.

use clinic_records_core::models::{Patient, PatientFields, SearchFilters};

use crate::flash::Flash;

/// Context for the list page.
pub struct IndexContext<'a> {
    pub patients: &'a [Patient],
    pub search: &'a SearchFilters,
    /// Default for the visit date input, `YYYY-MM-DD`
    pub today: &'a str,
    pub flash: &'a Flash,
}

/// Context for the edit page.
pub struct EditContext<'a> {
    pub patient: &'a Patient,
    pub flash: &'a Flash,
}

/// Escape text for element content and quoted attribute values.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, flash: &Flash, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
body {{ font-family: sans-serif; margin: 2rem; }}
table {{ border-collapse: collapse; width: 100%; }}
th, td {{ border: 1px solid #ccc; padding: 4px 8px; text-align: left; }}
.flash-error {{ color: #a40000; }}
.flash-success {{ color: #1c6b1c; }}
form.inline {{ display: inline; }}
</style>
</head>
<body>
<h1>{title}</h1>
{messages}
{body}
</body>
</html>
"#,
        title = escape(title),
        messages = render_flash(flash),
        body = body,
    )
}

fn render_flash(flash: &Flash) -> String {
    if flash.is_empty() {
        return String::new();
    }
    let items: String = flash
        .messages()
        .iter()
        .map(|m| {
            format!(
                "<li class=\"flash-{}\">{}</li>\n",
                m.category.as_str(),
                escape(&m.text)
            )
        })
        .collect();
    format!("<ul class=\"flashes\">\n{items}</ul>")
}

fn text_input(label: &str, name: &str, value: &str, kind: &str, required: bool) -> String {
    format!(
        "<label>{label} <input type=\"{kind}\" name=\"{name}\" value=\"{value}\"{req}></label>\n",
        label = escape(label),
        value = escape(value),
        req = if required { " required" } else { "" },
    )
}

/// The record form fields, shared by the create and edit forms.
fn patient_inputs(fields: &PatientFields) -> String {
    let age = fields.age.map(|a| a.to_string()).unwrap_or_default();
    [
        text_input("Patient ID", "patient_id", &fields.patient_id, "text", true),
        text_input("Serial No.", "serial_number", &fields.serial_number, "text", false),
        text_input("Date", "visit_date", &fields.visit_date, "date", true),
        text_input("Patient Name", "name", &fields.name, "text", true),
        text_input(
            "Father/Husband Name",
            "father_or_husband_name",
            &fields.father_or_husband_name,
            "text",
            false,
        ),
        text_input("Age", "age", &age, "number", false),
        text_input("Phone", "phone", &fields.phone, "text", false),
        text_input("Address", "address", &fields.address, "text", false),
        format!(
            "<label>Description <textarea name=\"description\">{}</textarea></label>\n",
            escape(&fields.description)
        ),
    ]
    .concat()
}

fn patient_row(patient: &Patient) -> String {
    let f = &patient.fields;
    let age = f.age.map(|a| a.to_string()).unwrap_or_default();
    let cells: String = [
        f.patient_id.as_str(),
        f.serial_number.as_str(),
        f.visit_date.as_str(),
        f.name.as_str(),
        f.father_or_husband_name.as_str(),
        age.as_str(),
        f.phone.as_str(),
        f.address.as_str(),
        f.description.as_str(),
    ]
    .iter()
    .map(|value| format!("<td>{}</td>", escape(value)))
    .collect();

    format!(
        "<tr>{cells}<td><a href=\"/patients/{id}/edit\">Edit</a> \
         <form class=\"inline\" method=\"post\" action=\"/patients/{id}/delete\">\
         <button type=\"submit\">Delete</button></form></td></tr>\n",
        id = patient.id,
    )
}

/// List page: create form, search form and the matching records.
pub fn index(ctx: &IndexContext<'_>) -> String {
    let defaults = PatientFields {
        visit_date: ctx.today.to_string(),
        ..PatientFields::default()
    };

    let search = [
        text_input("Patient ID", "patient_id", &ctx.search.patient_id, "text", false),
        text_input("Name", "name", &ctx.search.name, "text", false),
        text_input("Phone", "phone", &ctx.search.phone, "text", false),
        text_input("Address", "address", &ctx.search.address, "text", false),
    ]
    .concat();

    let rows: String = if ctx.patients.is_empty() {
        "<tr><td colspan=\"10\">No patients found.</td></tr>\n".to_string()
    } else {
        ctx.patients.iter().map(patient_row).collect()
    };

    let body = format!(
        r#"<h2>New Patient</h2>
<form method="post" action="/">
<input type="hidden" name="form_type" value="create">
{create}<button type="submit">Save</button>
</form>
<h2>Search</h2>
<form method="get" action="/">
{search}<button type="submit">Search</button> <a href="/">Clear</a>
</form>
<h2>Patients</h2>
<table>
<tr><th>Patient ID</th><th>Serial No.</th><th>Date</th><th>Name</th><th>Father/Husband</th><th>Age</th><th>Phone</th><th>Address</th><th>Description</th><th></th></tr>
{rows}</table>"#,
        create = patient_inputs(&defaults),
    );

    layout("Patient Records", ctx.flash, &body)
}

/// Edit page pre-filled with the record's current values.
pub fn edit(ctx: &EditContext<'_>) -> String {
    let body = format!(
        r#"<form method="post" action="/patients/{id}/edit">
{inputs}<button type="submit">Update</button> <a href="/">Cancel</a>
</form>"#,
        id = ctx.patient.id,
        inputs = patient_inputs(&ctx.patient.fields),
    );

    layout("Edit Patient", ctx.flash, &body)
}
