use gridpack::{GridPacker, InputItem};

fn main() {
    env_logger::init();

    let inputs: Vec<_> = (0..5).map(|_| InputItem::new((128, 128))).collect();

    let packer = GridPacker::new();

    match packer.pack(inputs) {
        Ok(output) => println!("Pack result: {:#?}", output),
        Err(err) => eprintln!("Error: {}", err),
    }
}
