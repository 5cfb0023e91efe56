use profile_registration::{
    config::Config,
    storage::{FileStorage, KeyValueStorage, LocalRegistrationStore, MemoryStorage, RegistrationStore, UserRecord, USERS_KEY},
    user::{Field, RegistrationController, RegistrationError, SelectedFile, SubmissionState, SubmitOutcome},
};
use std::cell::Cell;
use std::rc::Rc;
use tempfile::tempdir;

const MIB: usize = 1024 * 1024;

fn fill_form<S: RegistrationStore>(controller: &mut RegistrationController<S>, email: &str) {
    controller.change(Field::Firstname, "Jane");
    controller.change(Field::Lastname, "Doe");
    controller.change(Field::Company, "Demo Inc.");
    controller.change(Field::Email, email);
    controller.change(Field::Password, "Pa55word!");
}

fn one_mib_png() -> SelectedFile {
    SelectedFile::from_bytes("avatar.png", "image/png", vec![0xAB; MIB])
}

fn seeded_storage(email: &str) -> MemoryStorage {
    let existing = format!(
        r#"[{{"firstname":"Old","lastname":"User","email":"{}","company":"","password":"pw",
            "photo":"data:image/png;base64,AA==","createdAt":"2023-11-05T08:00:00.000Z"}}]"#,
        email
    );
    MemoryStorage::new().with_item(USERS_KEY, &existing)
}

#[tokio::test]
async fn test_register_new_user_end_to_end() {
    // Arrange
    let calls = Rc::new(Cell::new(0u32));
    let counter = Rc::clone(&calls);
    let mut controller = RegistrationController::new(LocalRegistrationStore::new(MemoryStorage::new()))
        .on_success(move || counter.set(counter.get() + 1));
    fill_form(&mut controller, "jane@example.com");
    assert!(controller.upload_photo(one_mib_png()).await);
    let preview = controller.photo().preview().unwrap().to_string();

    // Act
    let outcome = controller.submit();

    // Assert
    assert!(outcome.is_success());
    assert_eq!(calls.get(), 1);
    assert_eq!(controller.state(), SubmissionState::Editing);

    let users: Vec<UserRecord> = controller.store().list_users();
    assert_eq!(users.len(), 1);
    let user = &users[0];
    assert_eq!(user.firstname, "Jane");
    assert_eq!(user.lastname, "Doe");
    assert_eq!(user.company, "Demo Inc.");
    assert_eq!(user.email, "jane@example.com");
    assert_eq!(user.password, "Pa55word!");
    assert_eq!(user.photo, preview);
}

#[test]
fn test_register_without_photo_end_to_end() {
    // Arrange
    let calls = Rc::new(Cell::new(0u32));
    let counter = Rc::clone(&calls);
    let mut controller = RegistrationController::new(LocalRegistrationStore::new(MemoryStorage::new()))
        .on_success(move || counter.set(counter.get() + 1));
    fill_form(&mut controller, "jane@example.com");

    // Act
    let outcome = controller.submit();

    // Assert
    assert_eq!(outcome, SubmitOutcome::Failed(RegistrationError::MissingPhoto));
    assert_eq!(controller.banner(), Some("Please upload your profile photo"));
    assert_eq!(controller.state(), SubmissionState::Editing);
    assert_eq!(controller.store().storage().get_item(USERS_KEY).unwrap(), None);
    assert_eq!(calls.get(), 0);
}

#[tokio::test]
async fn test_register_duplicate_email_end_to_end() {
    // Arrange
    let mut controller = RegistrationController::new(LocalRegistrationStore::new(seeded_storage("jane@example.com")));
    fill_form(&mut controller, "jane@example.com");
    assert!(controller.upload_photo(one_mib_png()).await);

    // Act
    let outcome = controller.submit();

    // Assert
    assert_eq!(outcome, SubmitOutcome::Failed(RegistrationError::DuplicateEmail));
    assert_eq!(controller.banner(), Some("User with this email already exists"));
    let users = controller.store().list_users();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].firstname, "Old");
}

#[tokio::test]
async fn test_email_differing_in_case_registers() {
    let mut controller = RegistrationController::new(LocalRegistrationStore::new(seeded_storage("jane@example.com")));
    fill_form(&mut controller, "Jane@example.com");
    assert!(controller.upload_photo(one_mib_png()).await);

    assert!(controller.submit().is_success());
    assert_eq!(controller.store().list_users().len(), 2);
}

#[tokio::test]
async fn test_registrations_persist_to_disk() {
    let dir = tempdir().unwrap();
    let mut config = Config::default();
    config.storage.data_dir = dir.path().join("data").to_str().unwrap().to_string();

    for email in ["a@example.com", "b@example.com"] {
        let store = LocalRegistrationStore::from_config(&config).unwrap();
        let mut controller = RegistrationController::from_config(store, &config);
        fill_form(&mut controller, email);
        assert!(controller.upload_photo(one_mib_png()).await);
        assert!(controller.submit().is_success());
    }

    let store = LocalRegistrationStore::new(FileStorage::open(&config.storage.data_dir).unwrap());
    let emails: Vec<String> = store.list_users().into_iter().map(|u| u.email).collect();
    assert_eq!(emails, vec!["a@example.com", "b@example.com"]);
}

#[tokio::test]
async fn test_invalid_fields_block_submit_entirely() {
    let mut controller = RegistrationController::new(LocalRegistrationStore::new(MemoryStorage::new()));
    fill_form(&mut controller, "jane@example.com");
    controller.change(Field::Password, "far-too-long-password");
    assert!(controller.upload_photo(one_mib_png()).await);

    match controller.submit() {
        SubmitOutcome::Invalid(errors) => {
            assert_eq!(errors.len(), 1);
            assert_eq!(
                errors.messages()[&Field::Password],
                "Password must be less than 10 characters"
            );
        }
        other => panic!("expected validation failure, got {:?}", other),
    }
    assert!(controller.store().list_users().is_empty());
}
