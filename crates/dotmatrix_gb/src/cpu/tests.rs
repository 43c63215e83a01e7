use super::*;
use crate::interrupts::{Interrupt, InterruptController, InterruptFlags};

struct TestBus {
    memory: [u8; 0x10000],
    interrupts: InterruptController,
}

impl Default for TestBus {
    fn default() -> Self {
        Self {
            memory: [0; 0x10000],
            interrupts: InterruptController::default(),
        }
    }
}

impl Bus for TestBus {
    fn read8(&mut self, addr: u16) -> u8 {
        match addr {
            0xFF0F => self.interrupts.read_if(),
            0xFFFF => self.interrupts.read_ie(),
            _ => self.memory[addr as usize],
        }
    }

    fn write8(&mut self, addr: u16, value: u8) {
        match addr {
            0xFF0F => self.interrupts.write_if(value),
            0xFFFF => self.interrupts.write_ie(value),
            _ => self.memory[addr as usize] = value,
        }
    }
}

impl InterruptLines for TestBus {
    fn pending(&self) -> InterruptFlags {
        self.interrupts.pending()
    }

    fn acknowledge(&mut self, interrupt: Interrupt) {
        self.interrupts.clear(interrupt);
    }
}

const PROGRAM_BASE: u16 = 0xC000;

/// CPU + bus with `program` loaded at 0xC000 and PC pointing at it.
fn setup(program: &[u8]) -> (Cpu, TestBus) {
    let mut bus = TestBus::default();
    let base = PROGRAM_BASE as usize;
    bus.memory[base..base + program.len()].copy_from_slice(program);
    let mut cpu = Cpu::new();
    cpu.regs.pc = PROGRAM_BASE;
    cpu.regs.sp = 0xDFF0;
    (cpu, bus)
}

/// Documented T-cycle cost of every base opcode, branches not taken.
/// 0xCB is listed as 0: its cost comes from the CB table.
#[rustfmt::skip]
const BASE_CYCLES: [u8; 256] = [
    4, 12,  8,  8,  4,  4,  8,  4, 20,  8,  8,  8,  4,  4,  8,  4,
    4, 12,  8,  8,  4,  4,  8,  4, 12,  8,  8,  8,  4,  4,  8,  4,
    8, 12,  8,  8,  4,  4,  8,  4,  8,  8,  8,  8,  4,  4,  8,  4,
    8, 12,  8,  8, 12, 12, 12,  4,  8,  8,  8,  8,  4,  4,  8,  4,
    4,  4,  4,  4,  4,  4,  8,  4,  4,  4,  4,  4,  4,  4,  8,  4,
    4,  4,  4,  4,  4,  4,  8,  4,  4,  4,  4,  4,  4,  4,  8,  4,
    4,  4,  4,  4,  4,  4,  8,  4,  4,  4,  4,  4,  4,  4,  8,  4,
    8,  8,  8,  8,  8,  8,  4,  8,  4,  4,  4,  4,  4,  4,  8,  4,
    4,  4,  4,  4,  4,  4,  8,  4,  4,  4,  4,  4,  4,  4,  8,  4,
    4,  4,  4,  4,  4,  4,  8,  4,  4,  4,  4,  4,  4,  4,  8,  4,
    4,  4,  4,  4,  4,  4,  8,  4,  4,  4,  4,  4,  4,  4,  8,  4,
    4,  4,  4,  4,  4,  4,  8,  4,  4,  4,  4,  4,  4,  4,  8,  4,
    8, 12, 12, 16, 12, 16,  8, 16,  8, 16, 12,  0, 12, 24,  8, 16,
    8, 12, 12,  4, 12, 16,  8, 16,  8, 16, 12,  4, 12,  4,  8, 16,
   12, 12,  8,  4,  4, 16,  8, 16, 16,  4, 16,  4,  4,  4,  8, 16,
   12, 12,  8,  4,  4, 16,  8, 16, 12,  8, 16,  4,  4,  4,  8, 16,
];

/// Taken cost for the conditional branches.
fn taken_cycles(opcode: u8) -> Option<u8> {
    match opcode {
        0x20 | 0x28 | 0x30 | 0x38 => Some(12),
        0xC0 | 0xC8 | 0xD0 | 0xD8 => Some(20),
        0xC2 | 0xCA | 0xD2 | 0xDA => Some(16),
        0xC4 | 0xCC | 0xD4 | 0xDC => Some(24),
        _ => None,
    }
}

fn branch_condition_holds(opcode: u8, f: u8) -> bool {
    let z = f & 0x80 != 0;
    let c = f & 0x10 != 0;
    match (opcode >> 3) & 0x03 {
        0 => !z,
        1 => z,
        2 => !c,
        _ => c,
    }
}

#[test]
fn every_base_opcode_takes_its_documented_cycles() {
    for opcode in 0..=255u8 {
        if opcode == 0xCB {
            continue;
        }
        for f in [0x00u8, 0xF0] {
            let (mut cpu, mut bus) = setup(&[opcode, 0x00, 0x00]);
            cpu.regs.set_f(f);
            let cycles = cpu.step(&mut bus).unwrap();
            let expected = match taken_cycles(opcode) {
                Some(taken) if branch_condition_holds(opcode, f) => taken,
                _ => BASE_CYCLES[opcode as usize],
            };
            assert_eq!(
                cycles, expected as u32,
                "opcode 0x{opcode:02X} with F=0x{f:02X}"
            );
        }
    }
}

#[test]
fn conditional_branches_differ_between_taken_and_not_taken() {
    // JR NZ: Z set -> not taken.
    let (mut cpu, mut bus) = setup(&[0x20, 0x05]);
    cpu.regs.set_f(0x80);
    assert_eq!(cpu.step(&mut bus).unwrap(), 8);
    assert_eq!(cpu.regs.pc, PROGRAM_BASE + 2);

    let (mut cpu, mut bus) = setup(&[0x20, 0x05]);
    cpu.regs.set_f(0x00);
    assert_eq!(cpu.step(&mut bus).unwrap(), 12);
    assert_eq!(cpu.regs.pc, PROGRAM_BASE + 2 + 5);

    // CALL C,a16.
    let (mut cpu, mut bus) = setup(&[0xDC, 0x34, 0x12]);
    cpu.regs.set_f(0x00);
    assert_eq!(cpu.step(&mut bus).unwrap(), 12);
    let (mut cpu, mut bus) = setup(&[0xDC, 0x34, 0x12]);
    cpu.regs.set_f(0x10);
    assert_eq!(cpu.step(&mut bus).unwrap(), 24);
    assert_eq!(cpu.regs.pc, 0x1234);
    assert_eq!(cpu.pop_u16(&mut bus), PROGRAM_BASE + 3);
}

#[test]
fn every_cb_opcode_takes_its_documented_cycles() {
    for opcode in 0..=255u8 {
        let (mut cpu, mut bus) = setup(&[0xCB, opcode]);
        cpu.regs.set_hl(0xC800);
        let expected = match (opcode >> 6, opcode & 7) {
            (_, z) if z != 6 => 8,
            (1, _) => 12,
            _ => 16,
        };
        assert_eq!(
            cpu.step(&mut bus).unwrap(),
            expected,
            "CB opcode 0x{opcode:02X}"
        );
        assert_eq!(cpu.regs.pc, PROGRAM_BASE + 2);
    }
}

#[test]
fn f_low_nibble_always_reads_zero() {
    // LD SP,$C100 ; POP AF with $FFFF on the stack.
    let (mut cpu, mut bus) = setup(&[0x31, 0x00, 0xC1, 0xF1]);
    bus.memory[0xC100] = 0xFF;
    bus.memory[0xC101] = 0xFF;
    cpu.step(&mut bus).unwrap();
    cpu.step(&mut bus).unwrap();
    assert_eq!(cpu.regs.a, 0xFF);
    assert_eq!(cpu.regs.f(), 0xF0);
    assert_eq!(cpu.regs.af(), 0xFFF0);

    cpu.regs.set_af(0x120F);
    assert_eq!(cpu.regs.f(), 0x00);

    // Every opcode that writes F leaves the low nibble clear.
    for opcode in 0..=255u8 {
        let (mut cpu, mut bus) = setup(&[opcode, 0xFF, 0xFF]);
        cpu.regs.a = 0x9A;
        cpu.step(&mut bus).unwrap();
        assert_eq!(cpu.regs.f() & 0x0F, 0, "opcode 0x{opcode:02X}");
    }
}

#[test]
fn daa_corrects_bcd_addition() {
    // LD A,0 ; ADD A,$45 ; ADD A,$38 ; DAA
    let (mut cpu, mut bus) = setup(&[0x3E, 0x00, 0xC6, 0x45, 0xC6, 0x38, 0x27]);
    for _ in 0..4 {
        cpu.step(&mut bus).unwrap();
    }
    assert_eq!(cpu.regs.a, 0x83);
    assert!(!cpu.regs.flag(Flag::H));
    assert!(!cpu.regs.flag(Flag::C));
    assert!(!cpu.regs.flag(Flag::N));
    assert!(!cpu.regs.flag(Flag::Z));
}

#[test]
fn daa_after_subtraction_keeps_n() {
    // LD A,$20 ; SUB $01 ; DAA  -> BCD 20 - 1 = 19
    let (mut cpu, mut bus) = setup(&[0x3E, 0x20, 0xD6, 0x01, 0x27]);
    for _ in 0..3 {
        cpu.step(&mut bus).unwrap();
    }
    assert_eq!(cpu.regs.a, 0x19);
    assert!(cpu.regs.flag(Flag::N));
    assert!(!cpu.regs.flag(Flag::C));
}

#[test]
fn add_sp_e8_flags_come_from_low_byte() {
    let (mut cpu, mut bus) = setup(&[0xE8, 0x01]);
    cpu.regs.sp = 0x00FF;
    assert_eq!(cpu.step(&mut bus).unwrap(), 16);
    assert_eq!(cpu.regs.sp, 0x0100);
    assert!(cpu.regs.flag(Flag::H));
    assert!(cpu.regs.flag(Flag::C));
    assert!(!cpu.regs.flag(Flag::Z));
    assert!(!cpu.regs.flag(Flag::N));
}

#[test]
fn ld_hl_sp_offset_handles_negative_offsets() {
    // LD HL,SP-2
    let (mut cpu, mut bus) = setup(&[0xF8, 0xFE]);
    cpu.regs.sp = 0xD000;
    assert_eq!(cpu.step(&mut bus).unwrap(), 12);
    assert_eq!(cpu.regs.hl(), 0xCFFE);
    assert_eq!(cpu.regs.sp, 0xD000);
    // 0x00 + 0xFE: no carries out of bit 3 or bit 7.
    assert_eq!(cpu.regs.f(), 0x00);
}

#[test]
fn ld_abs_sp_stores_little_endian() {
    let (mut cpu, mut bus) = setup(&[0x08, 0x00, 0xC8]);
    cpu.regs.sp = 0xBEEF;
    assert_eq!(cpu.step(&mut bus).unwrap(), 20);
    assert_eq!(bus.memory[0xC800], 0xEF);
    assert_eq!(bus.memory[0xC801], 0xBE);
}

#[test]
fn ldh_forms_address_high_ram() {
    // LD A,$5A ; LDH ($80),A ; LD C,$81 ; LD (C),A ; LDH A,($80)
    let (mut cpu, mut bus) = setup(&[0x3E, 0x5A, 0xE0, 0x80, 0x0E, 0x81, 0xE2, 0xF0, 0x80]);
    for _ in 0..5 {
        cpu.step(&mut bus).unwrap();
    }
    assert_eq!(bus.memory[0xFF80], 0x5A);
    assert_eq!(bus.memory[0xFF81], 0x5A);
    assert_eq!(cpu.regs.a, 0x5A);
}

#[test]
fn hl_increment_and_decrement_loads() {
    // LD HL,$C800 ; LD (HL+),A ; LD (HL-),A
    let (mut cpu, mut bus) = setup(&[0x21, 0x00, 0xC8, 0x22, 0x32]);
    cpu.regs.a = 0x11;
    for _ in 0..3 {
        cpu.step(&mut bus).unwrap();
    }
    assert_eq!(bus.memory[0xC800], 0x11);
    assert_eq!(bus.memory[0xC801], 0x11);
    assert_eq!(cpu.regs.hl(), 0xC800);
}

#[test]
fn interrupt_priority_services_vblank_first() {
    let (mut cpu, mut bus) = setup(&[0x00]);
    cpu.state.ime = true;
    bus.interrupts.write_ie(0x1F);
    bus.interrupts.write_if(0x01 | 0x04 | 0x10);
    let sp = cpu.regs.sp;

    assert_eq!(cpu.step(&mut bus).unwrap(), 20);
    assert_eq!(cpu.regs.pc, 0x0040);
    assert_eq!(bus.interrupts.read_if(), 0xE0 | 0x04 | 0x10);
    assert!(!cpu.state.ime);
    assert_eq!(cpu.regs.sp, sp.wrapping_sub(2));
    // High byte pushed first, so it sits at the higher address.
    assert_eq!(bus.memory[sp.wrapping_sub(1) as usize], (PROGRAM_BASE >> 8) as u8);
    assert_eq!(bus.memory[sp.wrapping_sub(2) as usize], PROGRAM_BASE as u8);
}

#[test]
fn halt_bug_repeats_next_byte() {
    // HALT ; INC A ; with IME=0 and a timer interrupt already pending.
    let (mut cpu, mut bus) = setup(&[0x76, 0x3C, 0x00]);
    bus.interrupts.write_ie(0x04);
    bus.interrupts.write_if(0x04);
    cpu.regs.a = 0;
    let sp = cpu.regs.sp;

    assert_eq!(cpu.step(&mut bus).unwrap(), 4);
    assert!(!cpu.state.halted);
    assert!(cpu.state.halt_bug);

    // INC A is fetched without PC moving...
    assert_eq!(cpu.step(&mut bus).unwrap(), 4);
    assert_eq!(cpu.regs.a, 1);
    assert_eq!(cpu.regs.pc, PROGRAM_BASE + 1);
    // ...and then executed again.
    assert_eq!(cpu.step(&mut bus).unwrap(), 4);
    assert_eq!(cpu.regs.a, 2);
    assert_eq!(cpu.regs.pc, PROGRAM_BASE + 2);

    assert_eq!(bus.interrupts.read_if(), 0xE4);
    assert_eq!(cpu.regs.sp, sp);
}

#[test]
fn halt_without_ime_wakes_without_servicing() {
    // HALT ; INC A
    let (mut cpu, mut bus) = setup(&[0x76, 0x3C]);
    bus.interrupts.write_ie(0x04);
    cpu.regs.a = 0;
    let sp = cpu.regs.sp;

    cpu.step(&mut bus).unwrap();
    assert!(cpu.state.halted);
    // Idle while nothing is pending.
    assert_eq!(cpu.step(&mut bus).unwrap(), 4);
    assert_eq!(cpu.regs.pc, PROGRAM_BASE + 1);

    bus.interrupts.request(Interrupt::Timer);
    assert_eq!(cpu.step(&mut bus).unwrap(), 4);
    assert!(!cpu.state.halted);
    assert_eq!(cpu.regs.a, 1);
    assert_eq!(bus.interrupts.read_if(), 0xE4);
    assert_eq!(cpu.regs.sp, sp);
}

#[test]
fn halt_with_ime_services_on_wake() {
    let (mut cpu, mut bus) = setup(&[0x76, 0x00]);
    cpu.state.ime = true;
    bus.interrupts.write_ie(0x01);

    cpu.step(&mut bus).unwrap();
    assert!(cpu.state.halted);
    bus.interrupts.request(Interrupt::VBlank);
    assert_eq!(cpu.step(&mut bus).unwrap(), 20);
    assert!(!cpu.state.halted);
    assert_eq!(cpu.regs.pc, 0x0040);
    assert_eq!(cpu.pop_u16(&mut bus), PROGRAM_BASE + 1);
}

#[test]
fn ei_takes_effect_one_step_later() {
    // EI ; NOP
    let (mut cpu, mut bus) = setup(&[0xFB, 0x00]);
    bus.interrupts.write_ie(0x01);
    bus.interrupts.write_if(0x01);

    assert_eq!(cpu.step(&mut bus).unwrap(), 4);
    assert!(!cpu.state.ime);
    assert!(cpu.state.ei_pending);

    assert_eq!(cpu.step(&mut bus).unwrap(), 20);
    assert_eq!(cpu.regs.pc, 0x0040);
}

#[test]
fn di_after_ei_leaves_ime_off() {
    // EI ; DI ; NOP
    let (mut cpu, mut bus) = setup(&[0xFB, 0xF3, 0x00]);
    bus.interrupts.write_ie(0x01);
    bus.interrupts.write_if(0x01);
    cpu.step(&mut bus).unwrap();
    // IME flips on at the start of this step, so DI runs with IME set and
    // the pending VBlank is serviced first.
    assert_eq!(cpu.step(&mut bus).unwrap(), 20);

    let (mut cpu, mut bus) = setup(&[0xFB, 0xF3, 0x00]);
    cpu.step(&mut bus).unwrap();
    cpu.step(&mut bus).unwrap();
    assert!(!cpu.state.ime);
    assert!(!cpu.state.ei_pending);
    cpu.step(&mut bus).unwrap();
    assert!(!cpu.state.ime);
}

#[test]
fn reti_enables_ime_immediately() {
    let (mut cpu, mut bus) = setup(&[0xD9]);
    cpu.push_u16(&mut bus, 0x1234);
    assert_eq!(cpu.step(&mut bus).unwrap(), 16);
    assert_eq!(cpu.regs.pc, 0x1234);
    assert!(cpu.state.ime);
}

#[test]
fn stop_consumes_padding_byte() {
    let (mut cpu, mut bus) = setup(&[0x10, 0x00, 0x3C]);
    bus.memory[0xFF00] = 0xFF;
    assert_eq!(cpu.step(&mut bus).unwrap(), 4);
    assert_eq!(cpu.regs.pc, PROGRAM_BASE + 2);
    assert!(cpu.state.stopped);

    // Idles while no joypad line is low.
    assert_eq!(cpu.step(&mut bus).unwrap(), 4);
    assert_eq!(cpu.regs.pc, PROGRAM_BASE + 2);

    bus.memory[0xFF00] = 0xEE;
    cpu.step(&mut bus).unwrap();
    assert!(!cpu.state.stopped);
    assert_eq!(cpu.regs.a, 0x02);
}

#[test]
fn illegal_opcode_is_a_four_cycle_nop() {
    let (mut cpu, mut bus) = setup(&[0xD3, 0xFD]);
    let before = cpu.regs;
    assert_eq!(cpu.step(&mut bus).unwrap(), 4);
    assert_eq!(cpu.step(&mut bus).unwrap(), 4);
    assert_eq!(cpu.regs.pc, PROGRAM_BASE + 2);
    assert_eq!(cpu.regs.a, before.a);
    assert_eq!(cpu.regs.f(), before.f());
}

#[test]
fn locked_cpu_refuses_to_step() {
    let (mut cpu, mut bus) = setup(&[0x00]);
    cpu.set_lockup(0xDD, 0x4000);
    let err = cpu.step(&mut bus).unwrap_err();
    assert!(err.to_string().contains("0xDD"));
    assert_eq!(cpu.regs.pc, PROGRAM_BASE);
    cpu.reset();
    assert!(cpu.lockup().is_none());
}

#[test]
fn push_pop_round_trip_through_stack() {
    // LD BC,$1234 ; PUSH BC ; POP DE
    let (mut cpu, mut bus) = setup(&[0x01, 0x34, 0x12, 0xC5, 0xD1]);
    for _ in 0..3 {
        cpu.step(&mut bus).unwrap();
    }
    assert_eq!(cpu.regs.de(), 0x1234);
    assert_eq!(cpu.regs.sp, 0xDFF0);
}

#[test]
fn cb_ops_on_hl_memory() {
    // LD HL,$C800 ; SET 3,(HL) ; SWAP (HL) ; BIT 7,(HL)
    let (mut cpu, mut bus) = setup(&[0x21, 0x00, 0xC8, 0xCB, 0xDE, 0xCB, 0x36, 0xCB, 0x7E]);
    bus.memory[0xC800] = 0x01;
    for _ in 0..4 {
        cpu.step(&mut bus).unwrap();
    }
    assert_eq!(bus.memory[0xC800], 0x90);
    assert!(!cpu.regs.flag(Flag::Z));
    assert!(cpu.regs.flag(Flag::H));
}

#[test]
fn rst_and_jr_backwards() {
    // JR -2 loops onto itself.
    let (mut cpu, mut bus) = setup(&[0x18, 0xFE]);
    cpu.step(&mut bus).unwrap();
    assert_eq!(cpu.regs.pc, PROGRAM_BASE);

    let (mut cpu, mut bus) = setup(&[0xEF]);
    assert_eq!(cpu.step(&mut bus).unwrap(), 16);
    assert_eq!(cpu.regs.pc, 0x0028);
    assert_eq!(cpu.pop_u16(&mut bus), PROGRAM_BASE + 1);
}

#[test]
fn power_on_registers_match_post_boot_state() {
    let cpu = Cpu::new();
    assert_eq!(cpu.regs.af(), 0x01B0);
    assert_eq!(cpu.regs.bc(), 0x0013);
    assert_eq!(cpu.regs.de(), 0x00D8);
    assert_eq!(cpu.regs.hl(), 0x014D);
    assert_eq!(cpu.regs.sp, 0xFFFE);
    assert_eq!(cpu.regs.pc, 0x0100);
    assert_eq!(cpu.state, CpuState::default());
}
