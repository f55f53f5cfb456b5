#[tokio::main]
async fn main() {
    ea_desktop_emu_lib::run().await;
}
