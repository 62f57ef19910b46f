mod test_auth;
mod test_preferences;
