pub mod yaml_server;
