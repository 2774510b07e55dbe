//! Theoretical background.
//!
//! # Contents
//! - [Background](#background)
//! - [Integrators](#integrators)
//! - [Three bodies](#three-bodies)
//! - [Time dependence](#time-dependence)
//! - [Observables](#observables)
//!
//! # Background
//! Both models in this crate are Hamiltonian systems, and both are integrated
//! here with fixed-step schemes whose long-time behavior differs in a way that
//! short tests of local accuracy do not reveal. A generic scheme such as
//! fourth-order Runge-Kutta has a small truncation error per step but makes no
//! attempt to respect the geometric structure of the flow, so conserved
//! quantities like the total energy drift secularly. A *symplectic* scheme
//! such as leapfrog has a larger error per step but exactly conserves a
//! "shadow" Hamiltonian that differs from the true one by *O*(*h*²), so the
//! energy error stays bounded for exponentially long times[^1].
//!
//! All quantities are dimensionless: the gravitational constant is 1 for the
//! three-body problem, and *ħ* = *m* = 1 for the Schrödinger equation.
//!
//! # Integrators
//! For a first-order system *y*' = *f*(*t*, *y*), the classical Runge-Kutta
//! step is
//! ```text
//! k1 = f(t,       y)
//! k2 = f(t + h/2, y + h k1 / 2)
//! k3 = f(t + h/2, y + h k2 / 2)
//! k4 = f(t + h,   y + h k3)
//! y(t + h) = y + h (k1 + 2 k2 + 2 k3 + k4) / 6 + O(h⁵)
//! ```
//!
//! For a separable second-order system *r*' = *g*(*v*), *v*' = *a*(*r*), the
//! drift-kick-drift leapfrog step is
//! ```text
//! r(t + h/2) = r(t)       + (h/2) g(v(t))
//! v(t + h)   = v(t)       +  h    a(r(t + h/2))
//! r(t + h)   = r(t + h/2) + (h/2) g(v(t + h))
//! ```
//! Every sub-step is a shear in phase space, so the composite map preserves
//! phase-space area. The step is also symmetric: starting from (*r*(*t* +
//! *h*), -*v*(*t* + *h*)) and stepping again returns exactly to (*r*(*t*),
//! -*v*(*t*)) up to rounding. Negating the velocities halfway through a run
//! therefore brings a leapfrog trajectory back to its starting point, while a
//! Runge-Kutta trajectory returns only to within its accumulated truncation
//! error.
//!
//! The reference integrator is the adaptive Dormand-Prince 8(5,3) scheme[^2]
//! with tight error bounds, whose dense output is sampled on the same grid as
//! the fixed-step schemes.
//!
//! # Three bodies
//! Each body *i* feels the inverse-square attraction of its two partners,
//! ```text
//!          ___
//!          \      m_j (r_j - r_i)
//! a_i  =   /__    ---------------
//!        j ≠ i     |r_j - r_i|³
//! ```
//! and the total energy is
//! ```text
//!       ___                 ___
//!       \    1               \    m_i m_j
//! E  =  /__  - m_i |v_i|² -  /__  ---------
//!        i   2              i<j   |r_i - r_j|
//! ```
//!
//! The Euler collinear solution places all three bodies on a rotating line.
//! With bodies ordered 3, 2, 1 along the line, body 2 a distance *a* from body
//! 3 and *λ* *a* from body 1, the ratio *λ* is the unique positive root of
//! ```text
//! (m2 + m3) λ⁵ + (2 m2 + 3 m3) λ⁴ + (m2 + 3 m3) λ³
//!     - (3 m1 + m2) λ² - (3 m1 + 2 m2) λ - (m1 + m2) = 0
//! ```
//! which is found here with Halley's method (Newton's method augmented with the
//! second derivative). The separation then follows from requiring that gravity
//! supply the centripetal force for rigid rotation at rate *w*,
//! ```text
//! a³ w² = m2 + m3 - m1 (1 + 2λ) / (λ² (1 + λ)²)
//! ```
//! and each body moves with velocity *w* × *r* about the center of mass[^3].
//!
//! The figure-eight solution[^4] has three equal masses chasing each other
//! along a single figure-eight curve with period *T* ≈ 6.3259.
//!
//! # Time dependence
//! On a uniform grid *x*\[*i*\] = *x*₀ + *i* *h* with periodic boundaries, the
//! Hamiltonian *H* = -½ ∂²/∂*x*² + *V*(*x*) becomes the matrix
//! ```text
//! H[i, i]     = 1/h² + V(x[i])
//! H[i, i ± 1] = -1/(2 h²)          (indices mod N)
//! ```
//! Writing *ψ* = *R* + *i* *I* with real *R* and *I*, the Schrödinger
//! equation *i* ∂*ψ*/∂*t* = *H* *ψ* separates into
//! ```text
//! ∂R/∂t =  H I
//! ∂I/∂t = -H R
//! ```
//! which has exactly the form required by leapfrog, with *R* in the role of
//! position and *I* in the role of velocity[^5]. Each eigenmode of *H* with
//! energy *E* then evolves as a discrete harmonic oscillator of frequency *E*,
//! which is stable as long as *E* *dt* ≤ 2. The largest eigenvalue of the
//! kinetic part is 2/*h*², giving the default step *dt* = *h*²/2. Because the
//! scheme is symplectic, ∫|*ψ*|² is not conserved exactly but oscillates about
//! its initial value with relative amplitude of order (*E* *dt*)².
//!
//! *H* can be applied to a state as a dense product (*O*(*N*²) per step), as a
//! sparse product over its 3*N* non-zero elements, or elementwise:
//! ```text
//! (H q)[i] = H[i, i] q[i] + H[i, i + 1] (q[i - 1] + q[i + 1])
//! ```
//! using shifted copies of *q*. All three are numerically equivalent.
//!
//! # Observables
//! Given the density *ρ* = *R*² + *I*², the position and energy expectation
//! values at each recorded step are
//! ```text
//! ⟨x⟩ = ∫ x ρ dx
//! ⟨T⟩ = ½ ∫ (|∂R/∂x|² + |∂I/∂x|²) dx
//! ⟨V⟩ = ∫ V ρ dx
//! ```
//! with integrals evaluated by Simpson's rule and derivatives by central
//! differences. For a bound state, the time average of these quantities
//! satisfies the virial theorem
//! ```text
//! 2 ⟨T⟩ = ⟨x dV/dx⟩
//! ```
//! which for the harmonic potential *V* = *x*²/2 reduces to ⟨*T*⟩ = ⟨*V*⟩.
//! Averages are taken over one period 2*π* of the unit-frequency oscillator.
//!
//! [^1]: E. Hairer, C. Lubich, and G. Wanner, *Geometric Numerical
//! Integration*, 2nd ed. Springer (2006).
//!
//! [^2]: E. Hairer, S. P. Nørsett, and G. Wanner, *Solving Ordinary
//! Differential Equations I*, 2nd ed. Springer (1993).
//!
//! [^3]: L. Euler, "De motu rectilineo trium corporum se mutuo attrahentium."
//! Novi Commentarii academiae scientiarum Petropolitanae **11** 144-151 (1767).
//!
//! [^4]: A. Chenciner and R. Montgomery, "A remarkable periodic solution of the
//! three-body problem in the case of equal masses." Annals of Mathematics
//! **152** 881-901 (2000).
//!
//! [^5]: P. B. Visscher, "A fast explicit algorithm for the time-dependent
//! Schrödinger equation." Computers in Physics **5** 596 (1991).
