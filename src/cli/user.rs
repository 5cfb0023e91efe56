use anyhow::{Context, Result};
use log::{debug, error, info};
use std::path::Path;

use profile_registration::config;
use profile_registration::security::strength;
use profile_registration::storage::{FileStorage, LocalRegistrationStore, RegistrationStore};
use profile_registration::user::{Field, RegistrationController, SelectedFile, SubmitOutcome};

use crate::cli::utils::{display_strength, media_type_for, read_password, value_or_prompt};

/// Values passed on the command line; missing ones are prompted for
#[derive(Debug, Default)]
pub struct RegisterArgs {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub photo: String,
}

fn open_store() -> Result<LocalRegistrationStore<FileStorage>> {
    let config = config::get_config();
    LocalRegistrationStore::from_config(&config)
        .with_context(|| format!("Failed to open user storage at {}", config.storage.data_dir))
}

/// Handle user registration
pub async fn register(args: RegisterArgs) -> Result<bool> {
    let config = config::get_config();
    let store = open_store()?;
    let mut controller = RegistrationController::from_config(store, &config)
        .on_success(|| println!("\n✅ Account created."));

    let fields = [
        (Field::Firstname, args.firstname.as_ref(), "First Name*: "),
        (Field::Lastname, args.lastname.as_ref(), "Last Name*: "),
        (Field::Company, args.company.as_ref(), "Company: "),
        (Field::Email, args.email.as_ref(), "Email Address*: "),
    ];
    for (field, value, prompt) in fields {
        let value = value_or_prompt(value, prompt)?;
        controller.change(field, value);
        controller.blur(field);
    }

    let password = match args.password {
        Some(password) => password,
        None => read_password("Password: ")?,
    };
    controller.change(Field::Password, password);
    controller.blur(Field::Password);
    display_strength(controller.form().strength());

    let photo_path = Path::new(&args.photo);
    let media_type = media_type_for(photo_path);
    debug!("Photo {} declared as {}", photo_path.display(), media_type);
    let file = SelectedFile::from_path(photo_path, media_type)
        .await
        .with_context(|| format!("Failed to open photo: {}", photo_path.display()))?;

    if !controller.upload_photo(file).await {
        if let Some(message) = controller.banner() {
            println!("❌ {}", message);
        }
    }

    match controller.submit() {
        SubmitOutcome::Success(record) => {
            info!("Registered {}", record.email);
            println!("Welcome, {}!", record.full_name());
            Ok(true)
        }
        SubmitOutcome::Failed(e) => {
            error!("Registration failed: {}", e);
            println!("❌ {}", e);
            Ok(false)
        }
        SubmitOutcome::Invalid(errors) => {
            println!("❌ Please fix the following:");
            for (field, message) in errors.messages() {
                println!("  {:<10} {}", field, message);
            }
            Ok(false)
        }
    }
}

/// Handle listing registered users
pub fn list_users() -> Result<()> {
    let store = open_store()?;
    let users = store.list_users();

    if users.is_empty() {
        println!("No registered users.");
        return Ok(());
    }

    println!("{:<30} {:<30} {:<20} {}", "Name", "Email", "Company", "Registered");
    for user in &users {
        println!(
            "{:<30} {:<30} {:<20} {}",
            user.full_name(),
            user.email,
            user.company,
            user.created_at.to_rfc3339()
        );
    }
    println!("\n{} user(s)", users.len());

    Ok(())
}

/// Handle rating a password
pub fn show_strength(password: &str) -> Result<()> {
    let result = strength::score(password);
    display_strength(&result);
    Ok(())
}

/// Handle checking whether an email is taken
pub fn check_email(email: &str) -> Result<bool> {
    let store = open_store()?;
    let exists = store.email_exists(email);

    if exists {
        println!("{} is already registered.", email);
    } else {
        println!("{} is available.", email);
    }

    Ok(exists)
}
