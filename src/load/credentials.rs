use rand::Rng;
use rand::distributions::Alphanumeric;
use rand::seq::SliceRandom;

const EMAIL_DOMAINS: [&str; 2] = ["testcorp.com", "example.org"];
const PASSWORD_LEN: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedCredentials {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Derives credentials for a new virtual user from its numeric id.
///
/// The username is fixed by the id; the email domain and the password are
/// random.
#[must_use]
pub fn generate_credentials(numeric_id: u64) -> GeneratedCredentials {
    generate_credentials_with(numeric_id, &mut rand::thread_rng())
}

pub fn generate_credentials_with<R>(numeric_id: u64, rng: &mut R) -> GeneratedCredentials
where
    R: Rng + ?Sized,
{
    let username = format!("sim_user_{}", numeric_id);
    let domain = EMAIL_DOMAINS.choose(rng).copied().unwrap_or("example.org");
    let email = format!("{}@{}", username, domain);
    let password: String = std::iter::repeat_with(|| char::from(rng.sample(Alphanumeric)))
        .take(PASSWORD_LEN)
        .collect();
    GeneratedCredentials {
        username,
        email,
        password,
    }
}
