#[actix_web::main]
async fn main() -> std::io::Result<()> {
    absensi_server::run().await
}
