use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use once_cell::sync::OnceCell;

use super::*;
use crate::cpu::Bus;
use crate::error::{Access, CartridgeFeature, Error};
use crate::interrupts::{Interrupt, InterruptController};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Blank image for the given header codes. The first byte of every bank
/// holds the bank number so reads can tell banks apart.
fn rom_image(type_code: u8, size_code: u8) -> Vec<u8> {
    let banks = (32 * 1024usize << size_code) / ROM_BANK_SIZE;
    let mut rom = vec![0u8; banks * ROM_BANK_SIZE];
    for bank in 0..banks {
        rom[bank * ROM_BANK_SIZE] = bank as u8;
    }
    rom[0x0134..0x0138].copy_from_slice(b"TEST");
    rom[0x0147] = type_code;
    rom[0x0148] = size_code;
    rom
}

/// ROM-only image that jumps from the entry point to `program` at 0x0150.
fn program_rom(program: &[u8]) -> Vec<u8> {
    let mut rom = rom_image(0x00, 0x00);
    rom[0x0100..0x0103].copy_from_slice(&[0xC3, 0x50, 0x01]);
    rom[0x0150..0x0150 + program.len()].copy_from_slice(program);
    rom
}

/// Code that shifts `text` out of the serial port, one byte at a time.
fn serial_print(text: &[u8]) -> Vec<u8> {
    text.iter()
        .flat_map(|&b| [0x3E, b, 0xE0, 0x01, 0x3E, 0x81, 0xE0, 0x02])
        .collect()
}

fn test_bus() -> GameBoyBus<CapturedSerial> {
    let cartridge = Cartridge::from_rom(&rom_image(0x00, 0x00)).expect("valid ROM");
    GameBoyBus::new(cartridge, CapturedSerial::new())
}

#[test]
fn header_is_parsed() {
    let header = CartridgeHeader::parse(&rom_image(0x01, 0x02)).expect("valid header");
    assert_eq!(header.title, "TEST");
    assert_eq!(header.cartridge_type, CartridgeType::Mbc1);
    assert_eq!(header.rom_size_code, 0x02);
    assert_eq!(header.rom_banks, 8);

    for code in 0x01..=0x03 {
        assert_eq!(CartridgeType::from_code(code), Ok(CartridgeType::Mbc1));
    }
}

#[test]
fn rom_only_cartridge_with_wrong_size_is_rejected_before_execution() {
    let rom = rom_image(0x00, 0x01);
    let err = GameBoy::new(&rom, NullSerial).err();
    assert_eq!(
        err,
        Some(Error::UnsupportedCartridgeFeature(
            CartridgeFeature::RomBankCount {
                kind: CartridgeType::None,
                banks: 4,
            }
        ))
    );
}

#[test]
fn unsupported_header_codes_are_rejected() {
    let mut rom = vec![0u8; 0x8000];
    rom[0x0147] = 0x05;
    assert_eq!(
        CartridgeHeader::parse(&rom),
        Err(Error::from(CartridgeFeature::CartridgeType(0x05)))
    );

    rom[0x0147] = 0x01;
    rom[0x0148] = 0x09;
    assert_eq!(
        CartridgeHeader::parse(&rom),
        Err(Error::from(CartridgeFeature::RomSizeCode(0x09)))
    );

    rom[0x0148] = 0x07;
    assert_eq!(
        CartridgeHeader::parse(&rom),
        Err(Error::from(CartridgeFeature::RomBankCount {
            kind: CartridgeType::Mbc1,
            banks: 256,
        }))
    );

    assert_eq!(
        CartridgeHeader::parse(&[0u8; 0x100]),
        Err(Error::from(CartridgeFeature::TruncatedHeader(0x100)))
    );
}

#[test]
fn short_image_is_padded_to_declared_size() {
    let mut rom = rom_image(0x01, 0x00);
    rom.truncate(0x5000);
    let cart = Cartridge::from_rom(&rom).expect("valid header");
    assert_eq!(cart.read(0x4FFF), Ok(0x00));
    assert_eq!(cart.read(0x7FFF), Ok(0xFF));
}

#[test]
fn rom_only_cartridge_reads_both_banks_and_rejects_writes() {
    let mut cart = Cartridge::from_rom(&rom_image(0x00, 0x00)).expect("valid ROM");
    assert_eq!(cart.read(0x0000), Ok(0));
    assert_eq!(cart.read(0x4000), Ok(1));
    assert_eq!(cart.active_bank(), 1);
    assert_eq!(
        cart.write(0x2000, 0x01),
        Err(Error::UnsupportedCartridgeFeature(CartridgeFeature::RomWrite))
    );
}

#[test]
fn mbc1_bank_zero_selects_bank_one() {
    let mut cart = Cartridge::from_rom(&rom_image(0x01, 0x02)).expect("valid ROM");
    assert_eq!(cart.read(0x4000), Ok(1));

    cart.write(0x2000, 0x03).expect("bank select");
    assert_eq!(cart.read(0x4000), Ok(3));

    cart.write(0x2000, 0x00).expect("bank select");
    assert_eq!(cart.active_bank(), 1);
    assert_eq!(cart.read(0x4000), Ok(1));

    // Only five bits are latched.
    cart.write(0x3FFF, 0xE5).expect("bank select");
    assert_eq!(cart.read(0x4000), Ok(5));

    // Bank 0 stays fixed at 0x0000.
    assert_eq!(cart.read(0x0000), Ok(0));
}

#[test]
fn mbc1_upper_bits_extend_the_bank_number() {
    let mut cart = Cartridge::from_rom(&rom_image(0x01, 0x06)).expect("valid ROM");
    cart.write(0x2000, 0x01).expect("bank select");
    cart.write(0x4000, 0x01).expect("upper bits");
    assert_eq!(cart.active_bank(), 33);
    assert_eq!(cart.read(0x4000), Ok(33));

    cart.write(0x5FFF, 0xFF).expect("upper bits");
    assert_eq!(cart.active_bank(), 97);
}

#[test]
fn mbc1_bank_number_wraps_to_rom_size() {
    let mut cart = Cartridge::from_rom(&rom_image(0x01, 0x02)).expect("valid ROM");
    cart.write(0x2000, 0x09).expect("bank select");
    assert_eq!(cart.active_bank(), 1);
    cart.write(0x2000, 0x0E).expect("bank select");
    assert_eq!(cart.read(0x4000), Ok(6));
}

#[test]
fn mbc1_rejects_ram_and_advanced_mode() {
    let mut cart = Cartridge::from_rom(&rom_image(0x01, 0x02)).expect("valid ROM");
    for (addr, value) in [(0x0000, 0x0A), (0x0000, 0x00), (0x1FFF, 0x05)] {
        assert_eq!(
            cart.write(addr, value),
            Err(Error::from(CartridgeFeature::ExternalRam))
        );
    }
    // Rejected writes leave the bank selection alone.
    assert_eq!(cart.active_bank(), 1);
    assert_eq!(cart.write(0x6000, 0x00), Ok(()));
    assert_eq!(
        cart.write(0x6000, 0x01),
        Err(Error::from(CartridgeFeature::AdvancedBankingMode))
    );
    assert_eq!(cart.read_ram(0xA000), Err(Error::from(CartridgeFeature::ExternalRam)));
}

#[test]
fn work_ram_banks_and_high_ram_are_separate() {
    let mut bus = test_bus();
    bus.write8(0xC000, 0x11).unwrap();
    bus.write8(0xD000, 0x22).unwrap();
    bus.write8(0xDFFF, 0x33).unwrap();
    bus.write8(0xFF80, 0x44).unwrap();
    bus.write8(0xFFFE, 0x55).unwrap();

    assert_eq!(bus.read8(0xC000), Ok(0x11));
    assert_eq!(bus.read8(0xD000), Ok(0x22));
    assert_eq!(bus.read8(0xDFFF), Ok(0x33));
    assert_eq!(bus.read8(0xCFFF), Ok(0x00));
    assert_eq!(bus.read8(0xFF80), Ok(0x44));
    assert_eq!(bus.read8(0xFFFE), Ok(0x55));
}

#[test]
fn stub_regions_swallow_accesses() {
    let mut bus = test_bus();
    for addr in [0x8000, 0x9FFF, 0xFF40, 0xFF45, 0xFF47, 0xFF4B, 0xFF10, 0xFF3F] {
        assert_eq!(bus.write8(addr, 0xAB), Ok(()), "{addr:#06X}");
        assert_eq!(bus.read8(addr), Ok(0x00), "{addr:#06X}");
    }
    assert_eq!(bus.read8(0xFF44), Ok(LY_READY));
    assert_eq!(bus.read8(0xFF4D), Ok(0xFF));
}

#[test]
fn unmapped_addresses_are_errors() {
    let mut bus = test_bus();
    for addr in [0xE000, 0xFDFF, 0xFE00, 0xFF00, 0xFF46, 0xFF4C, 0xFF7F] {
        assert_eq!(
            bus.read8(addr),
            Err(Error::UnmappedAddress {
                addr,
                access: Access::Read,
            })
        );
        assert_eq!(
            bus.write8(addr, 0),
            Err(Error::UnmappedAddress {
                addr,
                access: Access::Write,
            })
        );
    }
    assert_eq!(
        bus.read8(0xA000),
        Err(Error::from(CartridgeFeature::ExternalRam))
    );
}

#[test]
fn interrupt_registers_are_masked() {
    let mut bus = test_bus();
    bus.write8(0xFF0F, 0xFF).unwrap();
    bus.write8(0xFFFF, 0xFF).unwrap();
    assert_eq!(bus.interrupts().flag(), 0x1F);
    assert_eq!(bus.read8(0xFF0F), Ok(0xFF));
    assert_eq!(bus.read8(0xFFFF), Ok(0x1F));

    bus.write8(0xFF0F, 0x04).unwrap();
    assert_eq!(bus.read8(0xFF0F), Ok(0xE4));
}

#[test]
fn timer_registers_are_mapped() {
    let mut bus = test_bus();
    bus.write8(0xFF04, 0x99).unwrap();
    bus.write8(0xFF05, 0x12).unwrap();
    bus.write8(0xFF06, 0x34).unwrap();
    bus.write8(0xFF07, 0x05).unwrap();

    assert_eq!(bus.read8(0xFF04), Ok(0x00));
    assert_eq!(bus.read8(0xFF05), Ok(0x12));
    assert_eq!(bus.read8(0xFF06), Ok(0x34));
    assert_eq!(bus.read8(0xFF07), Ok(0xFD));
    assert_eq!(bus.timer().divisor(), 16);

    bus.tick(32);
    assert_eq!(bus.read8(0xFF05), Ok(0x14));
}

#[test]
fn serial_control_flushes_latched_byte() {
    let mut bus = test_bus();
    bus.write8(0xFF01, b'O').unwrap();
    bus.write8(0xFF02, 0x01).unwrap();
    assert!(bus.serial_sink().is_empty());

    bus.write8(0xFF02, 0x81).unwrap();
    bus.write8(0xFF01, b'K').unwrap();
    bus.write8(0xFF02, 0x80).unwrap();
    assert_eq!(bus.serial_sink().text(), "OK");
    assert_eq!(bus.read8(0xFF01), Ok(b'K'));
    assert_eq!(bus.read8(0xFF02), Ok(0x00));
}

#[test]
fn disabled_timer_does_not_count() {
    let mut timer = Timer::new();
    let mut interrupts = InterruptController::new();
    timer.set_tac(0b011);
    timer.advance(10_000, &mut interrupts);
    assert_eq!(timer.tima(), 0);
    assert_eq!(timer.accumulator(), 0);
}

#[test]
fn timer_carries_leftover_cycles() {
    let mut timer = Timer::new();
    let mut interrupts = InterruptController::new();
    timer.set_tac(0b101);
    timer.set_tima(5);

    timer.advance(17, &mut interrupts);
    assert_eq!(timer.tima(), 6);

    timer.advance(300, &mut interrupts);
    assert_eq!(timer.tima(), 24);
    assert_eq!(timer.accumulator(), 13);

    timer.set_tac(0b111);
    timer.set_tima(8);
    timer.advance(300, &mut interrupts);
    assert_eq!(timer.tima(), 9);
    assert_eq!(timer.accumulator(), 57);
    assert_eq!(interrupts.flag(), 0);
}

#[test]
fn timer_overflow_reloads_and_requests_interrupt() {
    let mut timer = Timer::new();
    let mut interrupts = InterruptController::new();
    timer.set_tac(0b100);
    timer.set_tima(0xFF);
    timer.set_tma(0x42);

    timer.advance(1023, &mut interrupts);
    assert_eq!(timer.tima(), 0xFF);
    assert_eq!(interrupts.flag(), 0);

    timer.advance(1, &mut interrupts);
    assert_eq!(timer.tima(), 0x42);
    assert_eq!(interrupts.flag(), 0x04);
}

#[test]
fn timer_handles_several_overflows_in_one_advance() {
    let mut timer = Timer::new();
    let mut interrupts = InterruptController::new();
    timer.set_tac(0b101);
    timer.set_tima(0xFF);
    timer.set_tma(0xFE);

    timer.advance(48, &mut interrupts);
    assert_eq!(timer.tima(), 0xFE);
    assert_eq!(interrupts.flag(), 0x04);
}

#[test]
fn serial_program_reports_passed() {
    init_logger();
    let mut program = serial_print(b"Passed\n");
    program.extend_from_slice(&[0x18, 0xFE]);

    let mut gb = GameBoy::new(&program_rom(&program), CapturedSerial::new()).unwrap();
    gb.run_for(100).unwrap();
    assert_eq!(gb.serial().text(), "Passed\n");
    assert_eq!(gb.steps(), 100);
}

#[test]
fn run_until_stops_when_condition_holds() {
    let mut program = serial_print(b"ab\n");
    program.extend_from_slice(&[0x18, 0xFE]);

    let mut gb = GameBoy::new(&program_rom(&program), CapturedSerial::new()).unwrap();
    let done = gb
        .run_until(1_000, |gb| gb.serial().as_bytes().ends_with(b"\n"))
        .unwrap();
    assert!(done);
    // JP plus four instructions per byte.
    assert_eq!(gb.steps(), 1 + 3 * 4);
    assert_eq!(gb.serial().text(), "ab\n");
}

#[test]
fn timer_interrupt_wakes_halt_and_is_serviced() {
    init_logger();
    let mut program = vec![
        0x3E, 0x04, 0xE0, 0xFF, // IE = timer
        0x3E, 0xFF, 0xE0, 0x05, // TIMA = 0xFF
        0x3E, 0x42, 0xE0, 0x06, // TMA = 0x42
        0x3E, 0x05, 0xE0, 0x07, // TAC = enabled, 16 cycles
        0xFB, // EI
        0x76, // HALT
        0xF3, // DI
    ];
    program.extend(serial_print(b"D"));
    program.extend_from_slice(&[0x18, 0xFE]);

    let mut rom = program_rom(&program);
    let mut handler = serial_print(b"T");
    handler.push(0xD9); // RETI
    rom[0x0050..0x0050 + handler.len()].copy_from_slice(&handler);

    let mut gb = GameBoy::new(&rom, CapturedSerial::new()).unwrap();
    let done = gb.run_until(300, |gb| gb.serial().len() == 2).unwrap();
    assert!(done);
    assert_eq!(gb.serial().text(), "TD");
    assert_eq!(gb.bus().interrupts().flag() & 0x04, 0);
    assert!(!gb.bus().interrupts().master_enable());
}

#[test]
fn halt_without_ime_resumes_without_servicing() {
    let mut program = vec![
        0x3E, 0x04, 0xE0, 0xFF, // IE = timer
        0x3E, 0xFF, 0xE0, 0x05, // TIMA = 0xFF
        0x3E, 0x04, 0xE0, 0x07, // TAC = enabled, 1024 cycles
        0xF3, // DI
        0x76, // HALT
    ];
    program.extend(serial_print(b"W"));
    program.extend_from_slice(&[0x18, 0xFE]);

    let mut gb = GameBoy::new(&program_rom(&program), CapturedSerial::new()).unwrap();
    gb.run_for(100).unwrap();
    assert!(gb.cpu.halted);
    assert!(gb.serial().is_empty());

    gb.run_for(500).unwrap();
    assert!(!gb.cpu.halted);
    assert_eq!(gb.serial().text(), "W");
    assert_ne!(gb.bus().interrupts().flag() & 0x04, 0);
}

#[test]
fn invalid_opcode_stops_emulation() {
    let mut gb = GameBoy::new(&program_rom(&[0xD3]), NullSerial).unwrap();
    assert_eq!(gb.step(), Ok(4));
    assert_eq!(
        gb.step(),
        Err(Error::InvalidOpcode {
            opcode: 0xD3,
            pc: 0x0150,
        })
    );
}

#[test]
fn unmapped_write_stops_emulation() {
    let mut gb = GameBoy::new(&program_rom(&[0xEA, 0x00, 0xE0]), NullSerial).unwrap();
    gb.step().unwrap();
    assert_eq!(
        gb.step(),
        Err(Error::UnmappedAddress {
            addr: 0xE000,
            access: Access::Write,
        })
    );
}

#[test]
fn trace_sink_records_state_before_each_instruction() {
    let entries = Rc::new(RefCell::new(Vec::<TraceEntry>::new()));
    let mut gb = GameBoy::new(&program_rom(&[0x00, 0x3C]), NullSerial).unwrap();
    gb.set_trace(Rc::clone(&entries));
    gb.run_for(3).unwrap();

    let entries = entries.borrow();
    assert_eq!(entries.len(), 3);
    assert_eq!(
        entries[0].to_string(),
        "A: 01 F: B0 B: 00 C: 13 D: 00 E: D8 H: 01 L: 4D SP: FFFE PC: 00:0100 (C3 50 01 00)"
    );
    assert_eq!(entries[2].regs.pc, 0x0151);
    assert_eq!(entries[2].pcmem, [0x3C, 0x00, 0x00, 0x00]);

    gb.clear_trace();
    gb.step().unwrap();
    assert_eq!(gb.cpu.regs.a, 0x02);
}

#[test]
fn cycles_accumulate_across_steps() {
    let mut gb = GameBoy::new(&program_rom(&[0x00]), NullSerial).unwrap();
    let total: u32 = (0..2).map(|_| gb.step().unwrap()).sum();
    assert_eq!(total, 4 + 1);
    assert_eq!(gb.cycles(), 5);
}

#[test]
fn instruction_after_halt_wake_is_traced() {
    let program = [
        0x3E, 0x04, 0xE0, 0xFF, // IE = timer
        0xF3, // DI
        0x76, // HALT
        0x3C, // INC A
        0x18, 0xFE,
    ];
    let entries = Rc::new(RefCell::new(Vec::<TraceEntry>::new()));
    let mut gb = GameBoy::new(&program_rom(&program), NullSerial).unwrap();
    gb.set_trace(Rc::clone(&entries));

    gb.run_for(6).unwrap();
    assert!(gb.cpu.halted);
    assert_eq!(entries.borrow().len(), 5);

    gb.bus_mut().interrupts_mut().request(Interrupt::Timer);
    gb.step().unwrap();
    assert!(!gb.cpu.halted);
    assert_eq!(gb.cpu.regs.a, 0x05);

    let entries = entries.borrow();
    assert_eq!(entries.len(), 6);
    assert_eq!(entries[5].regs.pc, 0x0156);
    assert_eq!(entries[5].pcmem, [0x3C, 0x18, 0xFE, 0x00]);
}

#[test]
fn machine_state_is_reachable_between_steps() {
    let mut program = serial_print(b"ab");
    program.extend_from_slice(&[0x18, 0xFE]);
    let mut gb = GameBoy::new(&program_rom(&program), CapturedSerial::new()).unwrap();

    gb.run_for(5).unwrap();
    assert_eq!(gb.serial().text(), "a");
    gb.serial_mut().clear();
    assert!(gb.serial().is_empty());
    gb.run_for(4).unwrap();
    assert_eq!(gb.serial().text(), "b");

    let timer = gb.bus_mut().timer_mut();
    timer.set_tac(0b101);
    timer.set_tima(0x10);
    gb.run_for(1).unwrap();
    // One JR is 3 M-cycles, 12 clock cycles: not yet a full tick.
    assert_eq!(gb.bus().timer().tima(), 0x10);
    gb.run_for(1).unwrap();
    assert_eq!(gb.bus().timer().tima(), 0x11);
    assert_eq!(gb.bus().timer().accumulator(), 8);
    assert_eq!(gb.bus().cartridge().header().title, "TEST");
}

// Blargg's test ROMs are not distributed with the sources. Place them under
// `assets/roms/blargg/` (with the single tests in `individual/`) to run the
// conformance suite with `cargo test -- --ignored`.

const BLARGG_MAX_STEPS: u64 = 30_000_000;

static CPU_INSTRS_ROM: OnceCell<Vec<u8>> = OnceCell::new();

const CPU_INSTRS_EXPECT: &str = "cpu_instrs\n\n\
01:ok  02:ok  03:ok  04:ok  05:ok  06:ok  07:ok  08:ok  09:ok  10:ok  11:ok  \n\
\nPassed all tests\n";

fn load_blargg_rom(relative: &str) -> Vec<u8> {
    let candidates = [
        PathBuf::from("assets/roms/blargg").join(relative),
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../../assets/roms/blargg")
            .join(relative),
    ];

    for path in &candidates {
        if let Ok(data) = std::fs::read(path) {
            return data;
        }
    }

    panic!("{relative} not found. Tried: {candidates:?}")
}

fn run_blargg(rom: &[u8]) -> String {
    init_logger();
    let mut gb = GameBoy::new(rom, CapturedSerial::new()).expect("ROM should load");
    gb.run_until(BLARGG_MAX_STEPS, |gb| {
        let out = gb.serial().as_bytes();
        out.ends_with(b"Passed\n")
            || out.ends_with(b"Passed all tests\n")
            || out.windows(6).any(|w| w == b"Failed")
    })
    .expect("ROM should run without emulation errors");
    gb.serial().text()
}

#[test]
#[ignore = "requires assets/roms/blargg/cpu_instrs.gb"]
fn blargg_cpu_instrs() {
    let rom = CPU_INSTRS_ROM.get_or_init(|| load_blargg_rom("cpu_instrs.gb"));
    assert_eq!(run_blargg(rom), CPU_INSTRS_EXPECT);
}

#[test]
#[ignore = "requires the individual blargg cpu_instrs ROMs"]
fn blargg_individual_cpu_instrs() {
    let names = [
        "01-special",
        "02-interrupts",
        "03-op sp,hl",
        "04-op r,imm",
        "05-op rp",
        "06-ld r,r",
        "07-jr,jp,call,ret,rst",
        "08-misc instrs",
        "09-op r,r",
        "10-bit ops",
        "11-op a,(hl)",
    ];
    for name in names {
        let rom = load_blargg_rom(&format!("individual/{name}.gb"));
        assert_eq!(run_blargg(&rom), format!("{name}\n\n\nPassed\n"));
    }
}
