mod auth_client;
