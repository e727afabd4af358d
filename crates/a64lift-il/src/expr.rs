//! Expression IL and the per-lift function builder.

use crate::flag::FlagCondition;

/// Opaque handle to an expression in a [`LowLevelIlFunction`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ExprId(usize);

/// Register identifier, resolved through an architecture's register table.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct RegisterId(pub u32);

/// Handle to a branch target created by [`LowLevelIlFunction::label`].
///
/// Labels start unbound so branches can reference positions that do not
/// exist yet; [`LowLevelIlFunction::mark_label`] binds one to the next
/// appended instruction.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Label(usize);

/// Binary operations. Widths live on the expression, not the operation.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BinaryOp {
    Add,
    Mult,
    And,
    Or,
    ShiftLeft,
    RotateRight,
}

/// Expression and instruction nodes.
///
/// `size` fields are byte widths; evaluation masks every result to its size.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LowLevelIlExpr {
    /// Integer constant of `size` bytes.
    Const { size: usize, value: u64 },
    /// Register read at `size` bytes.
    Register { size: usize, reg: RegisterId },
    /// Flag-state test producing 0 or 1.
    Flag(FlagCondition),
    Binary {
        op: BinaryOp,
        size: usize,
        lhs: ExprId,
        rhs: ExprId,
    },
    /// Register write; becomes an instruction when appended to the body.
    SetRegister {
        size: usize,
        reg: RegisterId,
        value: ExprId,
    },
    /// Two-way conditional branch.
    If {
        condition: ExprId,
        true_target: Label,
        false_target: Label,
    },
    /// Unconditional branch.
    Goto(Label),
    /// Placeholder for semantics the lifter does not model.
    Unimplemented,
}

/// IL under construction for a single lift call.
///
/// Expressions live in an arena and are referenced by [`ExprId`]; the body
/// is the subset of expressions appended as instructions, in program order.
/// Builders never persist across lift calls.
#[derive(Default, Debug)]
pub struct LowLevelIlFunction {
    exprs: Vec<LowLevelIlExpr>,
    body: Vec<ExprId>,
    labels: Vec<Option<usize>>,
}

impl LowLevelIlFunction {
    /// Create an empty function.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, expr: LowLevelIlExpr) -> ExprId {
        let id = ExprId(self.exprs.len());
        self.exprs.push(expr);
        id
    }

    /// Integer constant of `size` bytes.
    pub fn const_int(&mut self, size: usize, value: u64) -> ExprId {
        self.push(LowLevelIlExpr::Const { size, value })
    }

    /// Register read at `size` bytes.
    pub fn register(&mut self, size: usize, reg: RegisterId) -> ExprId {
        self.push(LowLevelIlExpr::Register { size, reg })
    }

    /// Flag-state test for `condition`.
    pub fn flag_condition(&mut self, condition: FlagCondition) -> ExprId {
        self.push(LowLevelIlExpr::Flag(condition))
    }

    /// `lhs + rhs` at `size` bytes.
    pub fn add(&mut self, size: usize, lhs: ExprId, rhs: ExprId) -> ExprId {
        self.binary(BinaryOp::Add, size, lhs, rhs)
    }

    /// `lhs * rhs` at `size` bytes.
    pub fn mult(&mut self, size: usize, lhs: ExprId, rhs: ExprId) -> ExprId {
        self.binary(BinaryOp::Mult, size, lhs, rhs)
    }

    /// Bitwise `lhs & rhs` at `size` bytes.
    pub fn and(&mut self, size: usize, lhs: ExprId, rhs: ExprId) -> ExprId {
        self.binary(BinaryOp::And, size, lhs, rhs)
    }

    /// Bitwise `lhs | rhs` at `size` bytes.
    pub fn or(&mut self, size: usize, lhs: ExprId, rhs: ExprId) -> ExprId {
        self.binary(BinaryOp::Or, size, lhs, rhs)
    }

    /// `lhs << rhs` at `size` bytes.
    pub fn shift_left(&mut self, size: usize, lhs: ExprId, rhs: ExprId) -> ExprId {
        self.binary(BinaryOp::ShiftLeft, size, lhs, rhs)
    }

    /// `lhs` rotated right by `rhs` at `size` bytes.
    pub fn rotate_right(&mut self, size: usize, lhs: ExprId, rhs: ExprId) -> ExprId {
        self.binary(BinaryOp::RotateRight, size, lhs, rhs)
    }

    fn binary(&mut self, op: BinaryOp, size: usize, lhs: ExprId, rhs: ExprId) -> ExprId {
        self.push(LowLevelIlExpr::Binary { op, size, lhs, rhs })
    }

    /// Write `value` to `reg` at `size` bytes.
    pub fn set_register(&mut self, size: usize, reg: RegisterId, value: ExprId) -> ExprId {
        self.push(LowLevelIlExpr::SetRegister { size, reg, value })
    }

    /// Two-way branch on `condition`.
    pub fn if_expr(&mut self, condition: ExprId, true_target: Label, false_target: Label) -> ExprId {
        self.push(LowLevelIlExpr::If {
            condition,
            true_target,
            false_target,
        })
    }

    /// Unconditional branch to `target`.
    pub fn goto(&mut self, target: Label) -> ExprId {
        self.push(LowLevelIlExpr::Goto(target))
    }

    /// Placeholder instruction for unmodeled semantics.
    pub fn unimplemented(&mut self) -> ExprId {
        self.push(LowLevelIlExpr::Unimplemented)
    }

    /// Create an unbound label.
    pub fn label(&mut self) -> Label {
        let label = Label(self.labels.len());
        self.labels.push(None);
        label
    }

    /// Bind `label` to the next appended instruction.
    pub fn mark_label(&mut self, label: Label) {
        self.labels[label.0] = Some(self.body.len());
    }

    /// Append `instr` to the function body.
    pub fn add_instruction(&mut self, instr: ExprId) {
        self.body.push(instr);
    }

    /// Instructions in program order.
    #[must_use]
    pub fn instructions(&self) -> &[ExprId] {
        &self.body
    }

    /// Look up an expression node.
    #[must_use]
    pub fn expr(&self, id: ExprId) -> LowLevelIlExpr {
        self.exprs[id.0]
    }

    /// Instruction index a label is bound to, if it was marked.
    #[must_use]
    pub fn label_target(&self, label: Label) -> Option<usize> {
        self.labels[label.0]
    }

    /// Number of instructions in the body.
    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Whether the body holds no instructions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}
