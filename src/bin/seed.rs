use autoservice_api::{
    config::AppConfig,
    models::{Car, Role, User},
    services::init_default_data,
    state::AppState,
    store::{Collection, StoreError},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;
    let state = AppState::from_config(&config);

    init_default_data(&state.store).await?;

    let admin_id = ensure_user(&state, "Administrator", "admin@autoservice.local", "admin12345", Role::Admin).await?;
    let user_id = ensure_user(&state, "Demo user", "user@autoservice.local", "user12345", Role::User).await?;

    println!(
        "Seed completed in {}. Admin ID: {admin_id}, User ID: {user_id}",
        config.data_dir.display()
    );
    Ok(())
}

/// Create the user, or reset the role of an existing one with that email.
async fn ensure_user(
    state: &AppState,
    name: &str,
    email: &str,
    password: &str,
    role: Role,
) -> anyhow::Result<i64> {
    let stored_password = state.passwords.hash(password)?;

    let id = state
        .store
        .update(&Collection::Users, Vec::new, |users: &mut Vec<User>| {
            if let Some(existing) = users.iter_mut().find(|u| u.email == email) {
                existing.role = role;
                return Ok::<_, StoreError>(existing.id);
            }

            state.ids.observe(users.iter().map(|u| u.id).max());
            let user = User {
                id: state.ids.next_id(),
                name: name.to_string(),
                email: email.to_string(),
                password: stored_password,
                role,
                car: Car::default(),
            };
            let id = user.id;
            users.push(user);
            Ok(id)
        })
        .await?;

    Ok(id)
}
