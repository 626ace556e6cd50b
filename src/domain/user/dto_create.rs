/// Input for [`UserRepositoryInterface::create`](super::UserRepositoryInterface::create).
///
/// `password` is the already salted and hashed `salt.hash` value.
#[derive(Debug, Clone)]
pub struct CreateUserDto {
    pub email: String,
    pub password: String,
}
