mod client;

use std::time::Duration;

use anyhow::{bail, Context};
use api_shared::{DoctorId, DoctorRecord, SpecialitySelection};
use clap::{Args, Parser, Subcommand};
use docdir_core::{DoctorField, PostalCode};
use docdir_form::{
    FormController, HttpPostalCodeResolver, HttpSubmissionGateway, LookupStatus,
    PostalCodeResolver, Resolution, SpecialityPicker, SubmissionState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use client::DirectoryClient;

const DEFAULT_MAIN_URL: &str = "http://localhost:3000";

#[derive(Parser)]
#[command(name = "docdir")]
#[command(about = "Doctor directory CLI")]
struct Cli {
    /// Base URL of the directory API (falls back to DOCDIR_MAIN_URL)
    #[arg(long, global = true)]
    url: Option<String>,
    /// Request timeout in seconds
    #[arg(long, global = true, default_value_t = 10)]
    timeout_secs: u64,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List all doctors
    List,
    /// Show one doctor
    Show {
        /// Doctor id
        id: u64,
    },
    /// Add a doctor
    Add {
        #[arg(long, value_parser = name_input)]
        name: String,
        /// Medical certificate number (CRM)
        #[arg(long, value_parser = med_cert_id_input)]
        med_cert_id: String,
        #[command(flatten)]
        details: DetailArgs,
    },
    /// Edit a doctor; only the given fields change
    Edit {
        /// Doctor id
        id: u64,
        #[arg(long, value_parser = name_input)]
        name: Option<String>,
        #[arg(long, value_parser = med_cert_id_input)]
        med_cert_id: Option<String>,
        #[command(flatten)]
        details: DetailArgs,
    },
    /// Look up the address for a postal code
    Lookup {
        /// Eight-digit postal code (CEP)
        code: String,
    },
    /// List the speciality catalog
    Specialities,
}

#[derive(Args)]
struct DetailArgs {
    #[arg(long, value_parser = phone_input)]
    phone: Option<String>,
    #[arg(long, value_parser = mobile_phone_input)]
    mobile_phone: Option<String>,
    /// Postal code; a complete code fills the address fields
    #[arg(long, value_parser = zip_code_input)]
    zip_code: Option<String>,
    #[arg(long)]
    number: Option<String>,
    /// Overrides the looked-up street
    #[arg(long)]
    address: Option<String>,
    #[arg(long)]
    neighborhood: Option<String>,
    #[arg(long)]
    city: Option<String>,
    #[arg(long)]
    state_province: Option<String>,
    /// Speciality from the catalog (repeatable); replaces the current selection
    #[arg(long = "speciality")]
    specialities: Vec<String>,
}

/// Accepts `value` for `field` unless it is longer than the field's input cap.
fn capped_input(field: DoctorField, value: &str) -> Result<String, String> {
    field.check_input_len(value).map_err(|e| e.to_string())?;
    Ok(value.to_string())
}

fn name_input(value: &str) -> Result<String, String> {
    capped_input(DoctorField::Name, value)
}

fn med_cert_id_input(value: &str) -> Result<String, String> {
    capped_input(DoctorField::MedCertId, value)
}

fn phone_input(value: &str) -> Result<String, String> {
    capped_input(DoctorField::Phone, value)
}

fn mobile_phone_input(value: &str) -> Result<String, String> {
    capped_input(DoctorField::MobilePhone, value)
}

fn zip_code_input(value: &str) -> Result<String, String> {
    capped_input(DoctorField::ZipCode, value)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("docdir_form=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let base_url = cli
        .url
        .or_else(|| std::env::var("DOCDIR_MAIN_URL").ok())
        .unwrap_or_else(|| DEFAULT_MAIN_URL.into());
    let timeout = Duration::from_secs(cli.timeout_secs);

    match cli.command {
        Some(Commands::List) => {
            let doctors = DirectoryClient::new(&base_url, timeout)?.list_doctors().await?;
            if doctors.is_empty() {
                println!("No doctors found.");
            }
            for doctor in doctors {
                println!(
                    "ID: {}, Name: {}, CRM: {}, Specialities: {}",
                    doctor.id.map(|id| id.to_string()).unwrap_or_default(),
                    doctor.name,
                    doctor.med_cert_id,
                    doctor.speciality.display_label()
                );
            }
        }
        Some(Commands::Show { id }) => {
            let record = fetch_doctor(&base_url, timeout, id).await?;
            print_doctor(&record);
        }
        Some(Commands::Add {
            name,
            med_cert_id,
            details,
        }) => {
            let resolver = HttpPostalCodeResolver::new(&base_url, timeout)?;
            let gateway = HttpSubmissionGateway::new(&base_url, timeout)?;

            let mut form = FormController::create();
            form.set_field(DoctorField::Name, name)?;
            form.set_field(DoctorField::MedCertId, med_cert_id)?;
            fill_details(&mut form, details, &resolver).await?;

            let mut added = Vec::new();
            form.submit(&gateway, &mut added).await;
            report(&form)?;
            for record in &added {
                print_doctor(record);
            }
        }
        Some(Commands::Edit {
            id,
            name,
            med_cert_id,
            details,
        }) => {
            let record = fetch_doctor(&base_url, timeout, id).await?;
            let resolver = HttpPostalCodeResolver::new(&base_url, timeout)?;
            let gateway = HttpSubmissionGateway::new(&base_url, timeout)?;

            let mut form = FormController::edit(record)?;
            if let Some(name) = name {
                form.set_field(DoctorField::Name, name)?;
            }
            if let Some(med_cert_id) = med_cert_id {
                form.set_field(DoctorField::MedCertId, med_cert_id)?;
            }
            fill_details(&mut form, details, &resolver).await?;

            form.submit(&gateway, &mut Vec::new()).await;
            report(&form)?;
            print_doctor(form.draft());
        }
        Some(Commands::Lookup { code }) => {
            let code = PostalCode::parse(&code).context("invalid postal code")?;
            let resolver = HttpPostalCodeResolver::new(&base_url, timeout)?;
            match resolver.resolve(&code).await {
                Resolution::Resolved(found) => {
                    println!("{}: {}", DoctorField::Address.label(), found.address);
                    println!("{}: {}", DoctorField::Neighborhood.label(), found.neighborhood);
                    println!("{}: {}", DoctorField::City.label(), found.city);
                    println!("{}: {}", DoctorField::StateProvince.label(), found.state_province);
                }
                Resolution::NotFound => println!("No address found for {code}."),
                Resolution::TransportFailure(reason) => bail!("lookup failed: {reason}"),
            }
        }
        Some(Commands::Specialities) => {
            let names = DirectoryClient::new(&base_url, timeout)?.specialities().await?;
            for name in names {
                println!("{name}");
            }
        }
        None => {
            println!("Use 'docdir --help' for commands");
        }
    }

    Ok(())
}

async fn fetch_doctor(base_url: &str, timeout: Duration, id: u64) -> anyhow::Result<DoctorRecord> {
    let client = DirectoryClient::new(base_url, timeout)?;
    match client.doctor(DoctorId::new(id)).await? {
        Some(record) => Ok(record),
        None => bail!("doctor {id} not found"),
    }
}

/// Applies optional flags to the form. The postal code goes first so explicit address flags
/// win over looked-up values.
async fn fill_details(
    form: &mut FormController,
    details: DetailArgs,
    resolver: &dyn PostalCodeResolver,
) -> anyhow::Result<()> {
    if let Some(zip_code) = details.zip_code {
        if form.change_postal_code(zip_code, resolver).await.is_none() {
            eprintln!("Postal code is incomplete; address was not looked up.");
        }
        match form.lookup_status() {
            LookupStatus::NotFound => eprintln!("Postal code not found."),
            LookupStatus::Failed(reason) => eprintln!("Postal code lookup failed: {reason}"),
            _ => {}
        }
    }

    let fields = [
        (DoctorField::Phone, details.phone),
        (DoctorField::MobilePhone, details.mobile_phone),
        (DoctorField::Number, details.number),
        (DoctorField::Address, details.address),
        (DoctorField::Neighborhood, details.neighborhood),
        (DoctorField::City, details.city),
        (DoctorField::StateProvince, details.state_province),
    ];
    for (field, value) in fields {
        if let Some(value) = value {
            form.set_field(field, value)?;
        }
    }

    if !details.specialities.is_empty() {
        form.set_specialities(SpecialitySelection::new(details.specialities));
    }
    Ok(())
}

/// Prints the notification and any inline errors; fails if the doctor was not saved.
fn report(form: &FormController) -> anyhow::Result<()> {
    if let Some(notice) = form.notification() {
        println!("{}", notice.message);
    }
    for (field, message) in form.errors().iter() {
        println!("  {} ({field}): {message}", field.label());
    }
    if form.submission_state() != SubmissionState::Succeeded {
        bail!("doctor was not saved");
    }
    Ok(())
}

fn print_doctor(record: &DoctorRecord) {
    let picker = SpecialityPicker::default();
    if let Some(id) = record.id {
        println!("ID: {id}");
    }
    for field in DoctorField::ALL {
        let value = match field.text(record) {
            Some(text) => text.to_string(),
            None => picker.render_value(&record.speciality),
        };
        println!("{}: {value}", field.label());
    }
}
